// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::price_plan::MessageCategory;

/// 计费状态
///
/// 状态机：`pending -> {paid, failed}`，paid 与 failed 为终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

impl BillingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BillingStatus::Paid | BillingStatus::Failed)
    }

    pub fn can_transition_to(&self, next: BillingStatus) -> bool {
        matches!(
            (self, next),
            (BillingStatus::Pending, BillingStatus::Paid)
                | (BillingStatus::Pending, BillingStatus::Failed)
        )
    }
}

impl fmt::Display for BillingStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BillingStatus::Pending => write!(f, "pending"),
            BillingStatus::Paid => write!(f, "paid"),
            BillingStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for BillingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(BillingStatus::Pending),
            "paid" => Ok(BillingStatus::Paid),
            "failed" => Ok(BillingStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 会话计费记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub conversation_id: String,
    pub category: MessageCategory,
    pub recipient_number: String,
    pub country_code: Option<String>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: Option<DateTime<FixedOffset>>,
    pub billing_status: BillingStatus,
    pub amount_paise: i64,
    pub currency: String,
    pub price_plan_id: Option<Uuid>,
    pub wallet_tx_id: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// 待写入的计费记录
#[derive(Debug, Clone)]
pub struct NewBillingLog {
    pub user_id: Uuid,
    pub conversation_id: String,
    pub category: MessageCategory,
    pub recipient_number: String,
    pub country_code: Option<String>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: Option<DateTime<FixedOffset>>,
    pub amount_paise: i64,
    pub currency: String,
    pub price_plan_id: Option<Uuid>,
    /// 不扣款时的初始状态；扣款时由扣款结果决定
    pub billing_status: BillingStatus,
}

impl NewBillingLog {
    /// 计费扣款使用的幂等交易号
    pub fn debit_transaction_id(&self) -> String {
        format!("charge:{}:{}", self.user_id, self.conversation_id)
    }
}

/// 记录计费的结果
#[derive(Debug, Clone)]
pub struct ChargeOutcome {
    pub log: BillingLog,
    /// false 表示 (user_id, conversation_id) 已经计费过
    pub created: bool,
}

/// 日志查询范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogScope {
    /// 全部租户
    All,
    /// 指定用户集合
    Users(Vec<Uuid>),
}

/// 调用方提供的查询条件
#[derive(Debug, Clone, Default)]
pub struct LogCriteria {
    /// 匹配 conversation_id / recipient_number / country_code
    pub search: Option<String>,
    pub category: Option<MessageCategory>,
    pub billing_status: Option<BillingStatus>,
    pub start_date: Option<NaiveDate>,
    /// 包含当天
    pub end_date: Option<NaiveDate>,
}

/// 计费日志过滤条件
#[derive(Debug, Clone)]
pub struct BillingLogFilter {
    pub scope: LogScope,
    pub search: Option<String>,
    pub category: Option<MessageCategory>,
    pub billing_status: Option<BillingStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl BillingLogFilter {
    pub fn new(scope: LogScope, criteria: LogCriteria) -> Self {
        Self {
            scope,
            search: criteria
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            category: criteria.category,
            billing_status: criteria.billing_status,
            start_date: criteria.start_date,
            end_date: criteria.end_date,
        }
    }

    /// 范围为空用户集合时无需查询
    pub fn is_empty_scope(&self) -> bool {
        matches!(&self.scope, LogScope::Users(ids) if ids.is_empty())
    }
}

/// 按类别汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: MessageCategory,
    pub count: i64,
    pub total_paise: i64,
}

/// 分页结果
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}
