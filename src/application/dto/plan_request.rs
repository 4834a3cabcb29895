// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::price_plan::{MessageCategory, PlanRates, PricePlanPatch};
use crate::domain::services::plan_service::CreatePlan;
use crate::utils::errors::DomainError;
use crate::utils::money::PriceInput;

/// 创建价格方案请求
///
/// 价格字段接受数字或数字字符串，小于 10 的值按整币单位换算为 paise
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub utility: PriceInput,
    pub marketing: PriceInput,
    pub authentication: PriceInput,
    pub service: PriceInput,
    #[serde(default)]
    pub is_default: bool,
}

impl CreatePlanRequest {
    pub fn into_command(self) -> Result<CreatePlan, DomainError> {
        Ok(CreatePlan {
            name: self.name,
            rates: PlanRates {
                utility_paise: self.utility.to_paise()?,
                marketing_paise: self.marketing.to_paise()?,
                authentication_paise: self.authentication.to_paise()?,
                service_paise: self.service.to_paise()?,
            },
            is_default: self.is_default,
        })
    }
}

/// 部分更新价格方案，未提供的字段保持不变
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePlanRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub utility: Option<PriceInput>,
    pub marketing: Option<PriceInput>,
    pub authentication: Option<PriceInput>,
    pub service: Option<PriceInput>,
    pub is_default: Option<bool>,
}

fn optional_paise(input: Option<PriceInput>) -> Result<Option<i64>, DomainError> {
    input.map(|p| p.to_paise()).transpose()
}

impl UpdatePlanRequest {
    pub fn into_patch(self) -> Result<PricePlanPatch, DomainError> {
        Ok(PricePlanPatch {
            name: self.name,
            utility_paise: optional_paise(self.utility)?,
            marketing_paise: optional_paise(self.marketing)?,
            authentication_paise: optional_paise(self.authentication)?,
            service_paise: optional_paise(self.service)?,
            is_default: self.is_default,
        })
    }
}

/// 国家覆盖价
#[derive(Debug, Deserialize, Validate)]
pub struct OverrideRequest {
    /// ISO 3166-1 alpha-2
    #[validate(length(equal = 2))]
    pub country_code: String,
    pub category: MessageCategory,
    pub amount: PriceInput,
}

/// 分配方案
#[derive(Debug, Deserialize)]
pub struct AssignPlanRequest {
    pub plan_id: Uuid,
    /// 缺省为当前时间
    pub effective_from: Option<DateTime<FixedOffset>>,
}
