// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::pagination::PageQuery;
use crate::domain::models::billing_log::{BillingStatus, LogCriteria};
use crate::domain::models::price_plan::MessageCategory;
use crate::domain::services::billing_service::RecordCharge;
use crate::utils::errors::DomainError;
use crate::utils::money::PriceInput;

/// 计费日志查询参数
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LogQuery {
    #[validate(range(min = 1))]
    pub page: Option<u64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
    #[validate(length(max = 100))]
    pub search: Option<String>,
    pub category: Option<MessageCategory>,
    pub billing_status: Option<BillingStatus>,
    /// YYYY-MM-DD
    pub start_date: Option<NaiveDate>,
    /// YYYY-MM-DD，包含当天
    pub end_date: Option<NaiveDate>,
}

impl LogQuery {
    pub fn paging(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn criteria(&self) -> LogCriteria {
        LogCriteria {
            search: self.search.clone(),
            category: self.category,
            billing_status: self.billing_status,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// 手工计费请求
#[derive(Debug, Deserialize, Validate)]
pub struct RecordChargeRequest {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub conversation_id: String,
    pub category: MessageCategory,
    #[validate(length(min = 6, max = 20))]
    pub recipient_number: String,
    #[validate(length(equal = 2))]
    pub country_code: Option<String>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: Option<DateTime<FixedOffset>>,
    /// 缺省时按用户当前方案定价
    pub amount: Option<PriceInput>,
    #[serde(default)]
    pub debit_wallet: bool,
}

impl RecordChargeRequest {
    pub fn into_command(self) -> Result<RecordCharge, DomainError> {
        Ok(RecordCharge {
            user_id: self.user_id,
            conversation_id: self.conversation_id,
            category: self.category,
            recipient_number: self.recipient_number,
            country_code: self.country_code,
            start_time: self.start_time,
            end_time: self.end_time,
            amount_paise: self.amount.map(|a| a.to_paise()).transpose()?,
            debit_wallet: self.debit_wallet,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BillingStatus,
}
