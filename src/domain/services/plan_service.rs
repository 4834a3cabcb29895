// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::price_plan::{
    MessageCategory, NewPricePlan, PlanRates, PricePlan, PricePlanOverride, PricePlanPatch,
    UserPricePlan,
};
use crate::domain::models::user::{Requester, Role};
use crate::domain::repositories::price_plan_repository::PricePlanRepository;
use crate::domain::services::access_service::{ensure_super_admin, AccessService};
use crate::domain::services::pricing_service::PricingService;
use crate::utils::errors::DomainError;

/// 新建方案命令
#[derive(Debug, Clone)]
pub struct CreatePlan {
    pub name: String,
    pub rates: PlanRates,
    pub is_default: bool,
}

/// 价格方案服务
pub struct PlanService {
    plans: Arc<dyn PricePlanRepository>,
    pricing: Arc<PricingService>,
    access: Arc<AccessService>,
}

impl PlanService {
    pub fn new(
        plans: Arc<dyn PricePlanRepository>,
        pricing: Arc<PricingService>,
        access: Arc<AccessService>,
    ) -> Self {
        Self {
            plans,
            pricing,
            access,
        }
    }

    /// 超级管理员看到全部方案，聚合商只看到自己创建的方案
    pub async fn list(&self, requester: &Requester) -> Result<Vec<PricePlan>, DomainError> {
        match requester.role {
            Role::SuperAdmin => Ok(self.plans.list(None).await?),
            Role::Aggregator => Ok(self.plans.list(Some(requester.id)).await?),
            Role::User => Err(DomainError::Authorization(
                "Only administrators can list price plans".to_string(),
            )),
        }
    }

    pub async fn create(
        &self,
        requester: &Requester,
        command: CreatePlan,
    ) -> Result<PricePlan, DomainError> {
        let name = command.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Validation("Plan name is required".to_string()));
        }

        let is_default = match requester.role {
            Role::SuperAdmin => command.is_default,
            Role::Aggregator => {
                let floor = self.pricing.current_plan(requester.id).await?;
                if let Some((category, floor_paise, requested_paise)) =
                    command.rates.first_below(&floor.rates)
                {
                    tracing::warn!(
                        "Aggregator {} tried to price {} at {} below floor {}",
                        requester.id,
                        category,
                        requested_paise,
                        floor_paise
                    );
                    return Err(DomainError::BelowFloorPrice {
                        category,
                        floor_paise,
                        requested_paise,
                    });
                }
                if command.is_default {
                    tracing::debug!("Ignoring is_default from aggregator {}", requester.id);
                }
                false
            }
            Role::User => {
                return Err(DomainError::Authorization(
                    "Only administrators can create price plans".to_string(),
                ))
            }
        };

        let plan = self
            .plans
            .create(NewPricePlan {
                name,
                rates: command.rates,
                is_default,
                created_by: Some(requester.id),
            })
            .await?;

        tracing::info!(
            "Price plan {} ({}) created by {}",
            plan.id,
            plan.name,
            requester.id
        );
        Ok(plan)
    }

    pub async fn update(
        &self,
        requester: &Requester,
        id: Uuid,
        mut patch: PricePlanPatch,
    ) -> Result<PricePlan, DomainError> {
        ensure_super_admin(requester)?;
        if let Some(name) = patch.name.take() {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(DomainError::Validation("Plan name cannot be empty".to_string()));
            }
            patch.name = Some(name);
        }
        if patch.is_empty() {
            return Err(DomainError::Validation("No fields to update".to_string()));
        }
        Ok(self.plans.update(id, patch).await?)
    }

    pub async fn set_default(
        &self,
        requester: &Requester,
        id: Uuid,
    ) -> Result<PricePlan, DomainError> {
        ensure_super_admin(requester)?;
        let plan = self.plans.set_default(id).await?;
        tracing::info!("Price plan {} is now the default", plan.id);
        Ok(plan)
    }

    pub async fn list_overrides(
        &self,
        requester: &Requester,
        plan_id: Uuid,
    ) -> Result<Vec<PricePlanOverride>, DomainError> {
        let plan = self.get_plan(plan_id).await?;
        if !requester.is_super_admin() && plan.created_by != Some(requester.id) {
            return Err(DomainError::Authorization(
                "You do not have access to this plan".to_string(),
            ));
        }
        Ok(self.plans.list_overrides(plan_id).await?)
    }

    pub async fn upsert_override(
        &self,
        requester: &Requester,
        plan_id: Uuid,
        country_code: &str,
        category: MessageCategory,
        amount_paise: i64,
    ) -> Result<PricePlanOverride, DomainError> {
        ensure_super_admin(requester)?;
        let country = country_code.trim().to_ascii_uppercase();
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::Validation(format!(
                "Invalid country code: {}",
                country_code
            )));
        }
        if amount_paise < 0 {
            return Err(DomainError::Validation(
                "Override amount cannot be negative".to_string(),
            ));
        }
        self.get_plan(plan_id).await?;
        Ok(self
            .plans
            .upsert_override(plan_id, &country, category, amount_paise)
            .await?)
    }

    /// 给用户分配方案
    ///
    /// 普通用户不能给自己换方案；聚合商只能把自己创建的方案分配给其子用户
    ///
    /// 分配权限比读取更严：能读取某用户方案不代表能改它，普通用户对自己也只有读权限
    pub async fn assign(
        &self,
        requester: &Requester,
        user_id: Uuid,
        plan_id: Uuid,
        effective_from: Option<DateTime<FixedOffset>>,
    ) -> Result<UserPricePlan, DomainError> {
        if requester.role == Role::User {
            return Err(DomainError::Authorization(
                "Only administrators can assign price plans".to_string(),
            ));
        }
        self.access.ensure_can_access(requester, user_id).await?;

        let plan = self.get_plan(plan_id).await?;
        if requester.is_aggregator() && plan.created_by != Some(requester.id) {
            return Err(DomainError::Authorization(
                "Aggregators can only assign their own plans".to_string(),
            ));
        }

        let effective_from = effective_from.unwrap_or_else(|| Utc::now().fixed_offset());
        let assignment = self
            .plans
            .assign(user_id, plan.id, effective_from, Some(requester.id))
            .await?;
        tracing::info!(
            "Plan {} assigned to user {} effective {}",
            plan.id,
            user_id,
            effective_from
        );
        Ok(assignment)
    }

    pub async fn current_plan_for(
        &self,
        requester: &Requester,
        user_id: Uuid,
    ) -> Result<PricePlan, DomainError> {
        self.access.ensure_can_access(requester, user_id).await?;
        self.pricing.current_plan(user_id).await
    }

    async fn get_plan(&self, id: Uuid) -> Result<PricePlan, DomainError> {
        self.plans
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Price plan".to_string()))
    }
}

#[cfg(test)]
#[path = "plan_service_test.rs"]
mod tests;
