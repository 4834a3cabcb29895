// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 钱包流水，只追加
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wallet_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub transaction_id: String,
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub transaction_type: String,
    pub amount_paise: i64,
    pub balance_after_paise: i64,
    pub suspense_balance_after_paise: i64,
    pub description: Option<String>,
    pub reference_id: Option<String>,
    pub created_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallet_account::Entity",
        from = "Column::WalletId",
        to = "super::wallet_account::Column::Id"
    )]
    WalletAccount,
}

impl Related<super::wallet_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WalletAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
