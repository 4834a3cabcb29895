// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    sea_query::{Alias, Expr, Func, SimpleExpr},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::support::{contains_pattern, is_unique_violation, now, page_index, parse_column};
use super::wallet_repo_impl::post_in_transaction;
use crate::domain::models::billing_log::{
    BillingLog, BillingLogFilter, BillingStatus, CategorySummary, ChargeOutcome, LogScope,
    NewBillingLog,
};
use crate::domain::models::wallet::PostTransaction;
use crate::domain::repositories::billing_log_repository::BillingLogRepository;
use crate::infrastructure::database::entities::billing_log;
use crate::utils::errors::{DomainError, RepositoryError};

/// 计费日志仓库实现
#[derive(Clone)]
pub struct BillingLogRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl BillingLogRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_in<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        conversation_id: &str,
    ) -> Result<Option<BillingLog>, RepositoryError> {
        billing_log::Entity::find()
            .filter(billing_log::Column::UserId.eq(user_id))
            .filter(billing_log::Column::ConversationId.eq(conversation_id))
            .one(conn)
            .await?
            .map(BillingLog::try_from)
            .transpose()
    }

    fn filtered(filter: &BillingLogFilter) -> Select<billing_log::Entity> {
        billing_log::Entity::find().filter(filter_condition(filter))
    }
}

impl TryFrom<billing_log::Model> for BillingLog {
    type Error = RepositoryError;

    fn try_from(model: billing_log::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            conversation_id: model.conversation_id,
            category: parse_column("category", &model.category)?,
            recipient_number: model.recipient_number,
            country_code: model.country_code,
            start_time: model.start_time,
            end_time: model.end_time,
            billing_status: parse_column("billing_status", &model.billing_status)?,
            amount_paise: model.amount_paise,
            currency: model.currency,
            price_plan_id: model.price_plan_id,
            wallet_tx_id: model.wallet_tx_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// 时间统一以 UTC 存储，保证区间比较在各后端一致
fn to_utc(value: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    value.with_timezone(&Utc).fixed_offset()
}

fn day_start(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

/// 构造过滤条件
///
/// 日期区间按 UTC 自然日计算，结束日期包含当天。
fn filter_condition(filter: &BillingLogFilter) -> Condition {
    let mut condition = Condition::all();

    if let LogScope::Users(ids) = &filter.scope {
        condition = condition.add(billing_log::Column::UserId.is_in(ids.iter().copied()));
    }

    if let Some(search) = &filter.search {
        let pattern = contains_pattern(search);
        let matches = |column: billing_log::Column| {
            Expr::expr(Func::lower(Expr::col(column))).like(pattern.clone())
        };
        condition = condition.add(
            Condition::any()
                .add(matches(billing_log::Column::ConversationId))
                .add(matches(billing_log::Column::RecipientNumber))
                .add(matches(billing_log::Column::CountryCode)),
        );
    }

    if let Some(category) = filter.category {
        condition = condition.add(billing_log::Column::Category.eq(category.to_string()));
    }
    if let Some(status) = filter.billing_status {
        condition = condition.add(billing_log::Column::BillingStatus.eq(status.to_string()));
    }
    if let Some(start) = filter.start_date {
        condition = condition.add(billing_log::Column::StartTime.gte(day_start(start)));
    }
    if let Some(end) = filter.end_date {
        condition =
            condition.add(billing_log::Column::StartTime.lt(day_start(end) + Duration::days(1)));
    }

    condition
}

#[async_trait]
impl BillingLogRepository for BillingLogRepositoryImpl {
    async fn record_charge(
        &self,
        log: NewBillingLog,
        debit: Option<PostTransaction>,
    ) -> Result<ChargeOutcome, RepositoryError> {
        let txn = self.db.begin().await?;

        if let Some(existing) = Self::find_in(&txn, log.user_id, &log.conversation_id).await? {
            txn.commit().await?;
            return Ok(ChargeOutcome {
                log: existing,
                created: false,
            });
        }

        let (status, wallet_tx_id) = match debit {
            Some(request) => match post_in_transaction(&txn, &request, &log.currency).await {
                Ok(posted) => (BillingStatus::Paid, Some(posted.transaction.id)),
                Err(RepositoryError::Domain(e))
                    if matches!(e.as_ref(), DomainError::InsufficientFunds { .. }) =>
                {
                    warn!(
                        user_id = %log.user_id,
                        conversation_id = %log.conversation_id,
                        "Wallet debit rejected: {}", e
                    );
                    (BillingStatus::Failed, None)
                }
                Err(e) => {
                    txn.rollback().await?;
                    return Err(e);
                }
            },
            None => (log.billing_status, None),
        };

        let timestamp = now();
        let row = billing_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(log.user_id),
            conversation_id: Set(log.conversation_id.clone()),
            category: Set(log.category.to_string()),
            recipient_number: Set(log.recipient_number.clone()),
            country_code: Set(log.country_code.clone()),
            start_time: Set(to_utc(log.start_time)),
            end_time: Set(log.end_time.map(to_utc)),
            billing_status: Set(status.to_string()),
            amount_paise: Set(log.amount_paise),
            currency: Set(log.currency.clone()),
            price_plan_id: Set(log.price_plan_id),
            wallet_tx_id: Set(wallet_tx_id),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };

        match row.insert(&txn).await {
            Ok(inserted) => {
                txn.commit().await?;
                Ok(ChargeOutcome {
                    log: inserted.try_into()?,
                    created: true,
                })
            }
            Err(e) if is_unique_violation(&e) => {
                // 并发写入同一会话，回滚扣款并返回先到的记录
                txn.rollback().await?;
                debug!(
                    user_id = %log.user_id,
                    conversation_id = %log.conversation_id,
                    "Concurrent charge detected, returning existing log"
                );
                let existing = Self::find_in(self.db.as_ref(), log.user_id, &log.conversation_id)
                    .await?
                    .ok_or(RepositoryError::NotFound)?;
                Ok(ChargeOutcome {
                    log: existing,
                    created: false,
                })
            }
            Err(e) => {
                txn.rollback().await?;
                Err(e.into())
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BillingLog>, RepositoryError> {
        billing_log::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(BillingLog::try_from)
            .transpose()
    }

    async fn find_by_conversation(
        &self,
        user_id: Uuid,
        conversation_id: &str,
    ) -> Result<Option<BillingLog>, RepositoryError> {
        Self::find_in(self.db.as_ref(), user_id, conversation_id).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BillingStatus,
    ) -> Result<BillingLog, RepositoryError> {
        let txn = self.db.begin().await?;

        let model = billing_log::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let current: BillingStatus = parse_column("billing_status", &model.billing_status)?;
        if !current.can_transition_to(status) {
            txn.rollback().await?;
            return Err(DomainError::InvalidStatusTransition {
                from: current,
                to: status,
            }
            .into());
        }

        let mut active: billing_log::ActiveModel = model.into();
        active.billing_status = Set(status.to_string());
        active.updated_at = Set(now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        updated.try_into()
    }

    async fn list(
        &self,
        filter: &BillingLogFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<BillingLog>, u64), RepositoryError> {
        let paginator = Self::filtered(filter)
            .order_by_desc(billing_log::Column::StartTime)
            .order_by_desc(billing_log::Column::Id)
            .paginate(self.db.as_ref(), limit);

        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(page_index(page))
            .await?
            .into_iter()
            .map(BillingLog::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }

    async fn summarize(
        &self,
        filter: &BillingLogFilter,
    ) -> Result<Vec<CategorySummary>, RepositoryError> {
        let total = SimpleExpr::from(Func::cast_as(
            Func::sum(Expr::col(billing_log::Column::AmountPaise)),
            Alias::new("BIGINT"),
        ));

        let rows: Vec<(String, i64, Option<i64>)> = Self::filtered(filter)
            .select_only()
            .column(billing_log::Column::Category)
            .column_as(Expr::col(billing_log::Column::Id).count(), "count")
            .column_as(total, "total_paise")
            .group_by(billing_log::Column::Category)
            .order_by_asc(billing_log::Column::Category)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;

        rows.into_iter()
            .map(|(category, count, total)| {
                Ok(CategorySummary {
                    category: parse_column("category", &category)?,
                    count,
                    total_paise: total.unwrap_or(0),
                })
            })
            .collect()
    }

    async fn export(&self, filter: &BillingLogFilter) -> Result<Vec<BillingLog>, RepositoryError> {
        Self::filtered(filter)
            .order_by_desc(billing_log::Column::StartTime)
            .order_by_desc(billing_log::Column::Id)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(BillingLog::try_from)
            .collect()
    }
}
