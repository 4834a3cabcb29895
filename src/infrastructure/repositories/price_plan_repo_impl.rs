// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::support::{conflict_or, now, parse_column};
use crate::domain::models::price_plan::{
    MessageCategory, NewPricePlan, PlanRates, PricePlan, PricePlanOverride, PricePlanPatch,
    UserPricePlan,
};
use crate::domain::repositories::price_plan_repository::PricePlanRepository;
use crate::infrastructure::database::entities::{price_plan, price_plan_override, user_price_plan};
use crate::utils::errors::RepositoryError;

/// 价格方案仓库实现
#[derive(Clone)]
pub struct PricePlanRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl PricePlanRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<price_plan::Model> for PricePlan {
    fn from(model: price_plan::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            rates: PlanRates {
                utility_paise: model.utility_paise,
                marketing_paise: model.marketing_paise,
                authentication_paise: model.authentication_paise,
                service_paise: model.service_paise,
            },
            is_default: model.is_default,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl TryFrom<price_plan_override::Model> for PricePlanOverride {
    type Error = RepositoryError;

    fn try_from(model: price_plan_override::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            plan_id: model.plan_id,
            country_code: model.country_code,
            category: parse_column("category", &model.category)?,
            amount_paise: model.amount_paise,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<user_price_plan::Model> for UserPricePlan {
    fn from(model: user_price_plan::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            price_plan_id: model.price_plan_id,
            effective_from: model.effective_from,
            assigned_by: model.assigned_by,
            created_at: model.created_at,
        }
    }
}

/// 清除除 `keep` 之外的默认标记
async fn clear_default<C: ConnectionTrait>(conn: &C, keep: Option<Uuid>) -> Result<(), RepositoryError> {
    let mut update = price_plan::Entity::update_many()
        .col_expr(price_plan::Column::IsDefault, Expr::value(false))
        .col_expr(price_plan::Column::UpdatedAt, Expr::value(now()))
        .filter(price_plan::Column::IsDefault.eq(true));
    if let Some(id) = keep {
        update = update.filter(price_plan::Column::Id.ne(id));
    }
    update.exec(conn).await?;
    Ok(())
}

/// 区分名称冲突与默认方案唯一索引冲突
fn plan_conflict(err: DbErr) -> RepositoryError {
    let message = err.to_string();
    if message.contains("single_default") || message.contains("is_default") {
        conflict_or(err, "Another request changed the default price plan concurrently")
    } else {
        conflict_or(err, "A price plan with this name already exists")
    }
}

#[async_trait]
impl PricePlanRepository for PricePlanRepositoryImpl {
    async fn list(&self, created_by: Option<Uuid>) -> Result<Vec<PricePlan>, RepositoryError> {
        let mut query = price_plan::Entity::find();
        if let Some(owner) = created_by {
            query = query.filter(price_plan::Column::CreatedBy.eq(owner));
        }
        Ok(query
            .order_by_asc(price_plan::Column::Name)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PricePlan>, RepositoryError> {
        Ok(price_plan::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(Into::into))
    }

    async fn find_default(&self) -> Result<Option<PricePlan>, RepositoryError> {
        Ok(price_plan::Entity::find()
            .filter(price_plan::Column::IsDefault.eq(true))
            .one(self.db.as_ref())
            .await?
            .map(Into::into))
    }

    async fn create(&self, plan: NewPricePlan) -> Result<PricePlan, RepositoryError> {
        let txn = self.db.begin().await?;

        if plan.is_default {
            clear_default(&txn, None).await?;
        }

        let timestamp = now();
        let inserted = price_plan::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(plan.name),
            utility_paise: Set(plan.rates.utility_paise),
            marketing_paise: Set(plan.rates.marketing_paise),
            authentication_paise: Set(plan.rates.authentication_paise),
            service_paise: Set(plan.rates.service_paise),
            is_default: Set(plan.is_default),
            created_by: Set(plan.created_by),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&txn)
        .await
        .map_err(plan_conflict)?;

        txn.commit().await?;
        Ok(inserted.into())
    }

    async fn update(&self, id: Uuid, patch: PricePlanPatch) -> Result<PricePlan, RepositoryError> {
        let txn = self.db.begin().await?;

        let model = price_plan::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if patch.is_default == Some(true) {
            clear_default(&txn, Some(id)).await?;
        }

        let mut active: price_plan::ActiveModel = model.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(v) = patch.utility_paise {
            active.utility_paise = Set(v);
        }
        if let Some(v) = patch.marketing_paise {
            active.marketing_paise = Set(v);
        }
        if let Some(v) = patch.authentication_paise {
            active.authentication_paise = Set(v);
        }
        if let Some(v) = patch.service_paise {
            active.service_paise = Set(v);
        }
        if let Some(v) = patch.is_default {
            active.is_default = Set(v);
        }
        active.updated_at = Set(now());

        let updated = active
            .update(&txn)
            .await
            .map_err(plan_conflict)?;

        txn.commit().await?;
        Ok(updated.into())
    }

    async fn set_default(&self, id: Uuid) -> Result<PricePlan, RepositoryError> {
        let txn = self.db.begin().await?;

        let model = price_plan::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        clear_default(&txn, Some(id)).await?;

        let mut active: price_plan::ActiveModel = model.into();
        active.is_default = Set(true);
        active.updated_at = Set(now());
        let updated = active.update(&txn).await.map_err(plan_conflict)?;

        txn.commit().await?;
        Ok(updated.into())
    }

    async fn list_overrides(
        &self,
        plan_id: Uuid,
    ) -> Result<Vec<PricePlanOverride>, RepositoryError> {
        price_plan_override::Entity::find()
            .filter(price_plan_override::Column::PlanId.eq(plan_id))
            .order_by_asc(price_plan_override::Column::CountryCode)
            .order_by_asc(price_plan_override::Column::Category)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(PricePlanOverride::try_from)
            .collect()
    }

    async fn find_override(
        &self,
        plan_id: Uuid,
        country_code: &str,
        category: MessageCategory,
    ) -> Result<Option<PricePlanOverride>, RepositoryError> {
        price_plan_override::Entity::find()
            .filter(price_plan_override::Column::PlanId.eq(plan_id))
            .filter(price_plan_override::Column::CountryCode.eq(country_code))
            .filter(price_plan_override::Column::Category.eq(category.to_string()))
            .one(self.db.as_ref())
            .await?
            .map(PricePlanOverride::try_from)
            .transpose()
    }

    async fn upsert_override(
        &self,
        plan_id: Uuid,
        country_code: &str,
        category: MessageCategory,
        amount_paise: i64,
    ) -> Result<PricePlanOverride, RepositoryError> {
        let timestamp = now();
        let row = price_plan_override::ActiveModel {
            id: Set(Uuid::new_v4()),
            plan_id: Set(plan_id),
            country_code: Set(country_code.to_string()),
            category: Set(category.to_string()),
            amount_paise: Set(amount_paise),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        };

        price_plan_override::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    price_plan_override::Column::PlanId,
                    price_plan_override::Column::CountryCode,
                    price_plan_override::Column::Category,
                ])
                .update_columns([
                    price_plan_override::Column::AmountPaise,
                    price_plan_override::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        self.find_override(plan_id, country_code, category)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn assign(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        effective_from: DateTime<FixedOffset>,
        assigned_by: Option<Uuid>,
    ) -> Result<UserPricePlan, RepositoryError> {
        let inserted = user_price_plan::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            price_plan_id: Set(plan_id),
            effective_from: Set(effective_from.with_timezone(&Utc).fixed_offset()),
            assigned_by: Set(assigned_by),
            created_at: Set(now()),
        }
        .insert(self.db.as_ref())
        .await?;
        Ok(inserted.into())
    }

    async fn current_assignment(
        &self,
        user_id: Uuid,
        at: DateTime<FixedOffset>,
    ) -> Result<Option<UserPricePlan>, RepositoryError> {
        Ok(user_price_plan::Entity::find()
            .filter(user_price_plan::Column::UserId.eq(user_id))
            .filter(user_price_plan::Column::EffectiveFrom.lte(at.with_timezone(&Utc).fixed_offset()))
            .order_by_desc(user_price_plan::Column::EffectiveFrom)
            .order_by_desc(user_price_plan::Column::CreatedAt)
            .one(self.db.as_ref())
            .await?
            .map(Into::into))
    }
}
