// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::domain::models::price_plan::{
    MessageCategory, NewPricePlan, PricePlan, PricePlanOverride, PricePlanPatch, UserPricePlan,
};
use crate::utils::errors::RepositoryError;

/// 价格方案仓库特质
///
/// 默认方案标记的切换必须在单个事务内完成，保证任意时刻至多一个默认方案
#[async_trait]
pub trait PricePlanRepository: Send + Sync {
    /// 列出方案，`created_by` 为 `Some` 时只返回该用户创建的方案
    async fn list(&self, created_by: Option<Uuid>) -> Result<Vec<PricePlan>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PricePlan>, RepositoryError>;

    async fn find_default(&self) -> Result<Option<PricePlan>, RepositoryError>;

    /// 创建方案；`is_default` 为真时清除原默认方案。名称重复返回 `Conflict`
    async fn create(&self, plan: NewPricePlan) -> Result<PricePlan, RepositoryError>;

    /// 部分更新；`is_default = Some(true)` 时清除原默认方案
    async fn update(&self, id: Uuid, patch: PricePlanPatch) -> Result<PricePlan, RepositoryError>;

    /// 原子地把指定方案设为唯一默认方案
    async fn set_default(&self, id: Uuid) -> Result<PricePlan, RepositoryError>;

    async fn list_overrides(&self, plan_id: Uuid)
        -> Result<Vec<PricePlanOverride>, RepositoryError>;

    async fn find_override(
        &self,
        plan_id: Uuid,
        country_code: &str,
        category: MessageCategory,
    ) -> Result<Option<PricePlanOverride>, RepositoryError>;

    /// 按 (plan, country, category) 插入或更新覆盖价
    async fn upsert_override(
        &self,
        plan_id: Uuid,
        country_code: &str,
        category: MessageCategory,
        amount_paise: i64,
    ) -> Result<PricePlanOverride, RepositoryError>;

    /// 追加一条分配记录
    async fn assign(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        effective_from: DateTime<FixedOffset>,
        assigned_by: Option<Uuid>,
    ) -> Result<UserPricePlan, RepositoryError>;

    /// `effective_from <= at` 中最新的分配记录
    async fn current_assignment(
        &self,
        user_id: Uuid,
        at: DateTime<FixedOffset>,
    ) -> Result<Option<UserPricePlan>, RepositoryError>;
}
