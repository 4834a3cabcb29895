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
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::support::{conflict_or, now, page_index, parse_column};
use crate::domain::models::wallet::{
    PostTransaction, PostedTransaction, SystemWallet, SystemWalletType, WalletAccount,
    WalletTransaction,
};
use crate::domain::repositories::wallet_repository::WalletRepository;
use crate::infrastructure::database::entities::{system_wallet, wallet_account, wallet_transaction};
use crate::utils::errors::{DomainError, RepositoryError};

/// 钱包仓库实现
#[derive(Clone)]
pub struct WalletRepositoryImpl {
    db: Arc<DatabaseConnection>,
    currency: String,
}

impl WalletRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>, currency: impl Into<String>) -> Self {
        Self {
            db,
            currency: currency.into(),
        }
    }
}

impl From<wallet_account::Model> for WalletAccount {
    fn from(model: wallet_account::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            balance_paise: model.balance_paise,
            suspense_balance_paise: model.suspense_balance_paise,
            currency: model.currency,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl TryFrom<wallet_transaction::Model> for WalletTransaction {
    type Error = RepositoryError;

    fn try_from(model: wallet_transaction::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            transaction_type: parse_column("transaction_type", &model.transaction_type)?,
            transaction_id: model.transaction_id,
            user_id: model.user_id,
            wallet_id: model.wallet_id,
            amount_paise: model.amount_paise,
            balance_after_paise: model.balance_after_paise,
            suspense_balance_after_paise: model.suspense_balance_after_paise,
            description: model.description,
            reference_id: model.reference_id,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<system_wallet::Model> for SystemWallet {
    type Error = RepositoryError;

    fn try_from(model: system_wallet::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            wallet_type: parse_column("wallet_type", &model.wallet_type)?,
            balance_paise: model.balance_paise,
            updated_at: model.updated_at,
        })
    }
}

/// 在已有事务内记账
///
/// 先确保账户存在并加行锁，再检查幂等键，最后写回余额并追加流水。
/// 同一用户的并发记账在账户行锁上串行化。
pub(crate) async fn post_in_transaction<C>(
    conn: &C,
    request: &PostTransaction,
    currency: &str,
) -> Result<PostedTransaction, RepositoryError>
where
    C: ConnectionTrait,
{
    let timestamp = now();

    // 首次记账时惰性创建账户
    let blank = wallet_account::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(request.user_id),
        balance_paise: Set(0),
        suspense_balance_paise: Set(0),
        currency: Set(currency.to_string()),
        created_at: Set(timestamp),
        updated_at: Set(timestamp),
    };
    wallet_account::Entity::insert(blank)
        .on_conflict(
            OnConflict::column(wallet_account::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let account = wallet_account::Entity::find()
        .filter(wallet_account::Column::UserId.eq(request.user_id))
        .lock_exclusive()
        .one(conn)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    if let Some(existing) = wallet_transaction::Entity::find()
        .filter(wallet_transaction::Column::TransactionId.eq(request.transaction_id.as_str()))
        .one(conn)
        .await?
    {
        let existing = WalletTransaction::try_from(existing)?;
        if existing.matches(request) {
            return Ok(PostedTransaction {
                transaction: existing,
                created: false,
            });
        }
        return Err(RepositoryError::Conflict(format!(
            "Transaction {} already exists with different parameters",
            request.transaction_id
        )));
    }

    let next = WalletAccount::from(account.clone())
        .balances()
        .apply(request.transaction_type, request.amount_paise)?;

    let wallet_id = account.id;
    let mut active: wallet_account::ActiveModel = account.into();
    active.balance_paise = Set(next.balance_paise);
    active.suspense_balance_paise = Set(next.suspense_balance_paise);
    active.updated_at = Set(timestamp);
    active.update(conn).await?;

    let row = wallet_transaction::ActiveModel {
        id: Set(Uuid::new_v4()),
        transaction_id: Set(request.transaction_id.clone()),
        user_id: Set(request.user_id),
        wallet_id: Set(wallet_id),
        transaction_type: Set(request.transaction_type.to_string()),
        amount_paise: Set(request.amount_paise),
        balance_after_paise: Set(next.balance_paise),
        suspense_balance_after_paise: Set(next.suspense_balance_paise),
        description: Set(request.description.clone()),
        reference_id: Set(request.reference_id.clone()),
        created_at: Set(timestamp),
    }
    .insert(conn)
    .await
    .map_err(|e| conflict_or(e, "transaction_id is already in use"))?;

    Ok(PostedTransaction {
        transaction: row.try_into()?,
        created: true,
    })
}

#[async_trait]
impl WalletRepository for WalletRepositoryImpl {
    async fn find_account(&self, user_id: Uuid) -> Result<Option<WalletAccount>, RepositoryError> {
        Ok(wallet_account::Entity::find()
            .filter(wallet_account::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?
            .map(Into::into))
    }

    async fn post_transaction(
        &self,
        request: PostTransaction,
    ) -> Result<PostedTransaction, RepositoryError> {
        let txn = self.db.begin().await?;
        match post_in_transaction(&txn, &request, &self.currency).await {
            Ok(posted) => {
                txn.commit().await?;
                Ok(posted)
            }
            Err(e) => {
                txn.rollback().await?;
                Err(e)
            }
        }
    }

    async fn list_transactions(
        &self,
        user_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<WalletTransaction>, u64), RepositoryError> {
        let paginator = wallet_transaction::Entity::find()
            .filter(wallet_transaction::Column::UserId.eq(user_id))
            .order_by_desc(wallet_transaction::Column::CreatedAt)
            .order_by_desc(wallet_transaction::Column::Id)
            .paginate(self.db.as_ref(), limit);

        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(page_index(page))
            .await?
            .into_iter()
            .map(WalletTransaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total))
    }

    async fn list_system_wallets(&self) -> Result<Vec<SystemWallet>, RepositoryError> {
        system_wallet::Entity::find()
            .order_by_asc(system_wallet::Column::WalletType)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(SystemWallet::try_from)
            .collect()
    }

    async fn adjust_system_wallet(
        &self,
        wallet_type: SystemWalletType,
        delta_paise: i64,
    ) -> Result<SystemWallet, RepositoryError> {
        let txn = self.db.begin().await?;

        let wallet = system_wallet::Entity::find_by_id(wallet_type.to_string())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let balance = wallet
            .balance_paise
            .checked_add(delta_paise)
            .filter(|b| *b >= 0)
            .ok_or_else(|| DomainError::InsufficientFunds {
                available: wallet.balance_paise,
                required: delta_paise.saturating_abs(),
            })?;

        let mut active: system_wallet::ActiveModel = wallet.into();
        active.balance_paise = Set(balance);
        active.updated_at = Set(now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        updated.try_into()
    }
}
