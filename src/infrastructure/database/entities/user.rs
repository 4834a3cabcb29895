// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 用户数据库实体模型
///
/// 对应 users 表，role 以字符串存储并受 CHECK 约束
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_approved: bool,
    pub is_active: bool,
    #[sea_orm(unique)]
    pub whatsapp_phone_number_id: Option<String>,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::wallet_account::Entity")]
    WalletAccount,
    #[sea_orm(has_many = "super::billing_log::Entity")]
    BillingLogs,
    #[sea_orm(has_many = "super::contact::Entity")]
    Contacts,
}

impl Related<super::wallet_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WalletAccount.def()
    }
}

impl Related<super::billing_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillingLogs.def()
    }
}

impl Related<super::contact::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
