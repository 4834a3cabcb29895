// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_plan_overrides")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub plan_id: Uuid,
    pub country_code: String,
    pub category: String,
    pub amount_paise: i64,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::price_plan::Entity",
        from = "Column::PlanId",
        to = "super::price_plan::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    PricePlan,
}

impl Related<super::price_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricePlan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
