// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::wallet::{PostTransaction, TransactionType};

/// 管理员记账请求
#[derive(Debug, Deserialize, Validate)]
pub struct PostTransactionRequest {
    /// 幂等键，重复提交返回已有流水
    #[validate(length(min = 1, max = 128))]
    pub transaction_id: String,
    pub transaction_type: TransactionType,
    pub amount_paise: i64,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 128))]
    pub reference_id: Option<String>,
}

impl PostTransactionRequest {
    pub fn into_post(self, user_id: Uuid) -> PostTransaction {
        PostTransaction {
            transaction_id: self.transaction_id,
            user_id,
            transaction_type: self.transaction_type,
            amount_paise: self.amount_paise,
            description: self.description,
            reference_id: self.reference_id,
        }
    }
}

/// 系统钱包调整，带符号增量
#[derive(Debug, Deserialize)]
pub struct AdjustSystemWalletRequest {
    pub delta_paise: i64,
}
