// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// WhatsApp 会话类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageCategory {
    Utility,
    Marketing,
    Authentication,
    Service,
}

impl MessageCategory {
    pub const ALL: [MessageCategory; 4] = [
        MessageCategory::Utility,
        MessageCategory::Marketing,
        MessageCategory::Authentication,
        MessageCategory::Service,
    ];
}

impl fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MessageCategory::Utility => write!(f, "utility"),
            MessageCategory::Marketing => write!(f, "marketing"),
            MessageCategory::Authentication => write!(f, "authentication"),
            MessageCategory::Service => write!(f, "service"),
        }
    }
}

impl FromStr for MessageCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utility" => Ok(MessageCategory::Utility),
            "marketing" => Ok(MessageCategory::Marketing),
            "authentication" => Ok(MessageCategory::Authentication),
            "service" => Ok(MessageCategory::Service),
            _ => Err(()),
        }
    }
}

/// 各类别单价（paise）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlanRates {
    pub utility_paise: i64,
    pub marketing_paise: i64,
    pub authentication_paise: i64,
    pub service_paise: i64,
}

impl PlanRates {
    pub fn rate_for(&self, category: MessageCategory) -> i64 {
        match category {
            MessageCategory::Utility => self.utility_paise,
            MessageCategory::Marketing => self.marketing_paise,
            MessageCategory::Authentication => self.authentication_paise,
            MessageCategory::Service => self.service_paise,
        }
    }

    /// 返回第一个低于底价的类别及其底价
    pub fn first_below(&self, floor: &PlanRates) -> Option<(MessageCategory, i64, i64)> {
        MessageCategory::ALL.into_iter().find_map(|category| {
            let requested = self.rate_for(category);
            let minimum = floor.rate_for(category);
            (requested < minimum).then_some((category, minimum, requested))
        })
    }
}

/// 价格方案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePlan {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub rates: PlanRates,
    pub is_default: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// 新建价格方案
#[derive(Debug, Clone)]
pub struct NewPricePlan {
    pub name: String,
    pub rates: PlanRates,
    pub is_default: bool,
    pub created_by: Option<Uuid>,
}

/// 价格方案部分更新
///
/// 每个可变字段一个 `Option`，`None` 表示保持不变
#[derive(Debug, Clone, Default)]
pub struct PricePlanPatch {
    pub name: Option<String>,
    pub utility_paise: Option<i64>,
    pub marketing_paise: Option<i64>,
    pub authentication_paise: Option<i64>,
    pub service_paise: Option<i64>,
    pub is_default: Option<bool>,
}

impl PricePlanPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.utility_paise.is_none()
            && self.marketing_paise.is_none()
            && self.authentication_paise.is_none()
            && self.service_paise.is_none()
            && self.is_default.is_none()
    }
}

/// 国家 + 类别维度的覆盖价
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePlanOverride {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub country_code: String,
    pub category: MessageCategory,
    pub amount_paise: i64,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

/// 用户方案分配记录，只追加不修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPricePlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub price_plan_id: Uuid,
    pub effective_from: DateTime<FixedOffset>,
    pub assigned_by: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
}

/// 价格来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    CountryOverride,
    BaseRate,
}

/// 定价结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub plan_id: Uuid,
    pub category: MessageCategory,
    pub country_code: Option<String>,
    pub amount_paise: i64,
    pub source: PriceSource,
}
