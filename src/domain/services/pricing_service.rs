// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::price_plan::{MessageCategory, PricePlan, PriceQuote, PriceSource};
use crate::domain::repositories::price_plan_repository::PricePlanRepository;
use crate::utils::errors::DomainError;

/// 定价服务
///
/// 解析顺序：
/// 1. 用户 `effective_from <= at` 的最新分配记录对应的方案，没有则使用默认方案
/// 2. (方案, 国家, 类别) 的覆盖价
/// 3. 方案的类别基础价
pub struct PricingService {
    plans: Arc<dyn PricePlanRepository>,
}

impl PricingService {
    pub fn new(plans: Arc<dyn PricePlanRepository>) -> Self {
        Self { plans }
    }

    /// 用户当前生效的方案
    pub async fn current_plan(&self, user_id: Uuid) -> Result<PricePlan, DomainError> {
        self.plan_at(user_id, Utc::now().fixed_offset()).await
    }

    pub async fn plan_at(
        &self,
        user_id: Uuid,
        at: DateTime<FixedOffset>,
    ) -> Result<PricePlan, DomainError> {
        if let Some(assignment) = self.plans.current_assignment(user_id, at).await? {
            if let Some(plan) = self.plans.find_by_id(assignment.price_plan_id).await? {
                return Ok(plan);
            }
            tracing::warn!(
                "User {} is assigned to missing plan {}, falling back to default",
                user_id,
                assignment.price_plan_id
            );
        }

        self.plans
            .find_default()
            .await?
            .ok_or(DomainError::NoPlanAvailable(user_id))
    }

    pub async fn resolve_price(
        &self,
        user_id: Uuid,
        category: MessageCategory,
        country_code: Option<&str>,
    ) -> Result<PriceQuote, DomainError> {
        self.resolve_price_at(user_id, category, country_code, Utc::now().fixed_offset())
            .await
    }

    /// 给定时间点的价格，同样的输入与方案状态总是得到同样的结果
    pub async fn resolve_price_at(
        &self,
        user_id: Uuid,
        category: MessageCategory,
        country_code: Option<&str>,
        at: DateTime<FixedOffset>,
    ) -> Result<PriceQuote, DomainError> {
        let plan = self.plan_at(user_id, at).await?;

        let country = country_code
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty());

        if let Some(ref code) = country {
            if let Some(ov) = self.plans.find_override(plan.id, code, category).await? {
                return Ok(PriceQuote {
                    plan_id: plan.id,
                    category,
                    country_code: country,
                    amount_paise: ov.amount_paise,
                    source: PriceSource::CountryOverride,
                });
            }
        }

        Ok(PriceQuote {
            plan_id: plan.id,
            category,
            country_code: country,
            amount_paise: plan.rates.rate_for(category),
            source: PriceSource::BaseRate,
        })
    }
}

#[cfg(test)]
#[path = "pricing_service_test.rs"]
mod tests;
