// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::billing_log::{
    BillingLog, BillingLogFilter, BillingStatus, CategorySummary, ChargeOutcome, NewBillingLog,
};
use crate::domain::models::wallet::PostTransaction;
use crate::utils::errors::RepositoryError;

/// 计费日志仓库特质
#[async_trait]
pub trait BillingLogRepository: Send + Sync {
    /// 记录一次会话计费
    ///
    /// (user_id, conversation_id) 已存在时不做任何修改并返回已有记录。
    /// 提供 `debit` 时，扣款与日志写入在同一事务内完成：扣款成功记为 paid 并关联流水，
    /// 余额不足记为 failed；不扣款时使用 `log.billing_status`。
    async fn record_charge(
        &self,
        log: NewBillingLog,
        debit: Option<PostTransaction>,
    ) -> Result<ChargeOutcome, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BillingLog>, RepositoryError>;

    async fn find_by_conversation(
        &self,
        user_id: Uuid,
        conversation_id: &str,
    ) -> Result<Option<BillingLog>, RepositoryError>;

    /// 更新状态，非法迁移返回 `InvalidStatusTransition`
    async fn update_status(
        &self,
        id: Uuid,
        status: BillingStatus,
    ) -> Result<BillingLog, RepositoryError>;

    /// 分页查询，返回当前页与总数
    async fn list(
        &self,
        filter: &BillingLogFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<BillingLog>, u64), RepositoryError>;

    /// 同一过滤条件下的按类别汇总
    async fn summarize(
        &self,
        filter: &BillingLogFilter,
    ) -> Result<Vec<CategorySummary>, RepositoryError>;

    /// 不分页的全部匹配记录，用于导出
    async fn export(&self, filter: &BillingLogFilter) -> Result<Vec<BillingLog>, RepositoryError>;
}
