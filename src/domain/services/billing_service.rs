// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::billing_log::{
    BillingLog, BillingLogFilter, BillingStatus, CategorySummary, ChargeOutcome, LogCriteria,
    LogScope, NewBillingLog, Page,
};
use crate::domain::models::price_plan::MessageCategory;
use crate::domain::models::user::Requester;
use crate::domain::models::wallet::{PostTransaction, TransactionType};
use crate::domain::repositories::billing_log_repository::BillingLogRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::access_service::{ensure_super_admin, AccessService};
use crate::domain::services::pricing_service::PricingService;
use crate::utils::errors::DomainError;
use crate::utils::money::format_major_units;
use crate::utils::phone::{country_code_for_number, normalize_phone_number};

/// 导出 CSV 的固定列顺序
pub const CSV_COLUMNS: [&str; 9] = [
    "conversation_id",
    "category",
    "recipient_number",
    "start_time",
    "end_time",
    "billing_status",
    "amount",
    "currency",
    "country",
];

/// 记录计费命令
#[derive(Debug, Clone)]
pub struct RecordCharge {
    pub user_id: Uuid,
    pub conversation_id: String,
    pub category: MessageCategory,
    pub recipient_number: String,
    /// 为空时按号码前缀推断
    pub country_code: Option<String>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: Option<DateTime<FixedOffset>>,
    /// 为空时按用户当前方案定价
    pub amount_paise: Option<i64>,
    /// 是否同时从钱包扣款
    pub debit_wallet: bool,
}

/// 日志视图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogView {
    /// 调用方自己的日志
    Own,
    /// 全部租户（超级管理员）
    All,
    /// 受管子用户
    Managed,
}

/// 列表结果，附带同一过滤条件下的类别汇总
#[derive(Debug, Clone, Serialize)]
pub struct LogListing {
    #[serde(flatten)]
    pub page: Page<BillingLog>,
    pub summary: Vec<CategorySummary>,
}

/// 计费服务
pub struct BillingService {
    logs: Arc<dyn BillingLogRepository>,
    users: Arc<dyn UserRepository>,
    pricing: Arc<PricingService>,
    access: Arc<AccessService>,
    currency: String,
}

impl BillingService {
    pub fn new(
        logs: Arc<dyn BillingLogRepository>,
        users: Arc<dyn UserRepository>,
        pricing: Arc<PricingService>,
        access: Arc<AccessService>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            logs,
            users,
            pricing,
            access,
            currency: currency.into(),
        }
    }

    /// 管理员手工记账
    pub async fn record_charge_as(
        &self,
        requester: &Requester,
        command: RecordCharge,
    ) -> Result<ChargeOutcome, DomainError> {
        ensure_super_admin(requester)?;
        if self.users.find_by_id(command.user_id).await?.is_none() {
            return Err(DomainError::NotFound("User".to_string()));
        }
        self.record_charge(command).await
    }

    /// 记录一次会话计费
    ///
    /// 同一 (user_id, conversation_id) 只计费一次，重复调用返回首次结果
    pub async fn record_charge(&self, command: RecordCharge) -> Result<ChargeOutcome, DomainError> {
        let conversation_id = command.conversation_id.trim().to_string();
        if conversation_id.is_empty() {
            return Err(DomainError::Validation(
                "conversation_id is required".to_string(),
            ));
        }
        let recipient_number = normalize_phone_number(&command.recipient_number);
        if recipient_number.is_empty() {
            return Err(DomainError::Validation(
                "recipient_number is required".to_string(),
            ));
        }
        if let Some(end) = command.end_time {
            if end < command.start_time {
                return Err(DomainError::Validation(
                    "end_time cannot be before start_time".to_string(),
                ));
            }
        }

        if let Some(existing) = self
            .logs
            .find_by_conversation(command.user_id, &conversation_id)
            .await?
        {
            counter!("billing_duplicate_charges_total").increment(1);
            tracing::debug!(
                "Conversation {} for user {} already billed",
                conversation_id,
                command.user_id
            );
            return Ok(ChargeOutcome {
                log: existing,
                created: false,
            });
        }

        let country_code = command
            .country_code
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
            .or_else(|| country_code_for_number(&recipient_number).map(str::to_string));

        let (amount_paise, price_plan_id) = match command.amount_paise {
            Some(amount) if amount < 0 => {
                return Err(DomainError::Validation(
                    "Amount cannot be negative".to_string(),
                ))
            }
            Some(amount) => {
                let plan_id = match self.pricing.current_plan(command.user_id).await {
                    Ok(plan) => Some(plan.id),
                    Err(DomainError::NoPlanAvailable(_)) => None,
                    Err(e) => return Err(e),
                };
                (amount, plan_id)
            }
            None => {
                let quote = self
                    .pricing
                    .resolve_price(command.user_id, command.category, country_code.as_deref())
                    .await?;
                (quote.amount_paise, Some(quote.plan_id))
            }
        };

        // 零金额无需扣款，直接视为已支付
        let billing_status = if command.debit_wallet && amount_paise == 0 {
            BillingStatus::Paid
        } else {
            BillingStatus::Pending
        };

        let log = NewBillingLog {
            user_id: command.user_id,
            conversation_id,
            category: command.category,
            recipient_number,
            country_code,
            start_time: command.start_time,
            end_time: command.end_time,
            amount_paise,
            currency: self.currency.clone(),
            price_plan_id,
            billing_status,
        };

        let debit = (command.debit_wallet && amount_paise > 0).then(|| PostTransaction {
            transaction_id: log.debit_transaction_id(),
            user_id: log.user_id,
            transaction_type: TransactionType::Debit,
            amount_paise,
            description: Some(format!(
                "{} conversation {}",
                log.category, log.conversation_id
            )),
            reference_id: Some(log.conversation_id.clone()),
        });

        let outcome = self.logs.record_charge(log, debit).await?;

        if outcome.created {
            counter!("billing_charges_total", "category" => outcome.log.category.to_string())
                .increment(1);
            if outcome.log.wallet_tx_id.is_some() {
                counter!("wallet_transactions_total", "type" => TransactionType::Debit.to_string())
                    .increment(1);
            }
            if outcome.log.billing_status == BillingStatus::Failed {
                counter!("wallet_insufficient_funds_total").increment(1);
                tracing::warn!(
                    "Conversation {} for user {} recorded as failed: insufficient funds",
                    outcome.log.conversation_id,
                    outcome.log.user_id
                );
            } else {
                tracing::info!(
                    "Billed conversation {} for user {}: {} paise ({})",
                    outcome.log.conversation_id,
                    outcome.log.user_id,
                    outcome.log.amount_paise,
                    outcome.log.billing_status
                );
            }
        } else {
            counter!("billing_duplicate_charges_total").increment(1);
        }

        Ok(outcome)
    }

    pub async fn update_status(
        &self,
        requester: &Requester,
        id: Uuid,
        status: BillingStatus,
    ) -> Result<BillingLog, DomainError> {
        ensure_super_admin(requester)?;
        let log = self.logs.update_status(id, status).await?;
        tracing::info!("Billing log {} moved to {}", log.id, log.billing_status);
        Ok(log)
    }

    pub async fn list(
        &self,
        requester: &Requester,
        view: LogView,
        criteria: LogCriteria,
        page: u64,
        limit: u64,
    ) -> Result<LogListing, DomainError> {
        let filter = self.filter_for(requester, view, criteria).await?;
        if filter.is_empty_scope() {
            return Ok(LogListing {
                page: Page {
                    items: Vec::new(),
                    total: 0,
                    page,
                    limit,
                },
                summary: Vec::new(),
            });
        }

        let (items, total) = self.logs.list(&filter, page, limit).await?;
        let summary = self.logs.summarize(&filter).await?;
        Ok(LogListing {
            page: Page {
                items,
                total,
                page,
                limit,
            },
            summary,
        })
    }

    pub async fn export_csv(
        &self,
        requester: &Requester,
        view: LogView,
        criteria: LogCriteria,
    ) -> Result<String, DomainError> {
        let filter = self.filter_for(requester, view, criteria).await?;
        let logs = if filter.is_empty_scope() {
            Vec::new()
        } else {
            self.logs.export(&filter).await?
        };
        render_csv(&logs)
    }

    async fn filter_for(
        &self,
        requester: &Requester,
        view: LogView,
        criteria: LogCriteria,
    ) -> Result<BillingLogFilter, DomainError> {
        if let (Some(start), Some(end)) = (criteria.start_date, criteria.end_date) {
            if start > end {
                return Err(DomainError::Validation(
                    "start_date must not be after end_date".to_string(),
                ));
            }
        }

        let scope = match view {
            LogView::Own => LogScope::Users(vec![requester.id]),
            LogView::All => {
                ensure_super_admin(requester)?;
                LogScope::All
            }
            LogView::Managed => self.access.managed_scope(requester).await?,
        };
        Ok(BillingLogFilter::new(scope, criteria))
    }
}

/// 按固定列渲染 CSV，金额为三位小数的主币单位
pub fn render_csv(logs: &[BillingLog]) -> Result<String, DomainError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    let to_err = |e: csv::Error| DomainError::Database(format!("Failed to write CSV: {}", e));

    writer.write_record(CSV_COLUMNS).map_err(to_err)?;
    for log in logs {
        writer
            .write_record([
                log.conversation_id.clone(),
                log.category.to_string(),
                log.recipient_number.clone(),
                log.start_time.to_rfc3339(),
                log.end_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
                log.billing_status.to_string(),
                format_major_units(log.amount_paise),
                log.currency.clone(),
                log.country_code.clone().unwrap_or_default(),
            ])
            .map_err(to_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DomainError::Database(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| DomainError::Database(format!("CSV is not valid UTF-8: {}", e)))
}

#[cfg(test)]
#[path = "billing_service_test.rs"]
mod tests;
