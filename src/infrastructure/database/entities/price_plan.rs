// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 价格方案，各类别单价以 paise 存储
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub utility_paise: i64,
    pub marketing_paise: i64,
    pub authentication_paise: i64,
    pub service_paise: i64,
    pub is_default: bool,
    pub created_by: Option<Uuid>,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::price_plan_override::Entity")]
    Overrides,
}

impl Related<super::price_plan_override::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Overrides.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
