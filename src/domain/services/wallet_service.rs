// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::billing_log::Page;
use crate::domain::models::user::Requester;
use crate::domain::models::wallet::{
    PostTransaction, PostedTransaction, SystemWallet, SystemWalletType, WalletTransaction,
};
use crate::domain::repositories::wallet_repository::WalletRepository;
use crate::domain::services::access_service::{ensure_super_admin, AccessService};
use crate::utils::errors::DomainError;

/// 钱包视图；账户尚未创建时余额为零
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletSummary {
    pub user_id: Uuid,
    pub balance_paise: i64,
    pub suspense_balance_paise: i64,
    pub currency: String,
}

/// 钱包服务
pub struct WalletService {
    wallets: Arc<dyn WalletRepository>,
    access: Arc<AccessService>,
    currency: String,
}

impl WalletService {
    pub fn new(
        wallets: Arc<dyn WalletRepository>,
        access: Arc<AccessService>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            wallets,
            access,
            currency: currency.into(),
        }
    }

    pub async fn summary(
        &self,
        requester: &Requester,
        user_id: Uuid,
    ) -> Result<WalletSummary, DomainError> {
        self.access.ensure_can_access(requester, user_id).await?;
        let account = self.wallets.find_account(user_id).await?;
        Ok(match account {
            Some(account) => WalletSummary {
                user_id,
                balance_paise: account.balance_paise,
                suspense_balance_paise: account.suspense_balance_paise,
                currency: account.currency,
            },
            None => WalletSummary {
                user_id,
                balance_paise: 0,
                suspense_balance_paise: 0,
                currency: self.currency.clone(),
            },
        })
    }

    pub async fn transactions(
        &self,
        requester: &Requester,
        user_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<Page<WalletTransaction>, DomainError> {
        self.access.ensure_can_access(requester, user_id).await?;
        let (items, total) = self.wallets.list_transactions(user_id, page, limit).await?;
        Ok(Page {
            items,
            total,
            page,
            limit,
        })
    }

    /// 管理员记账入口
    pub async fn post(
        &self,
        requester: &Requester,
        request: PostTransaction,
    ) -> Result<PostedTransaction, DomainError> {
        ensure_super_admin(requester)?;
        self.post_unchecked(request).await
    }

    /// 内部记账，调用方负责授权
    pub async fn post_unchecked(
        &self,
        request: PostTransaction,
    ) -> Result<PostedTransaction, DomainError> {
        let transaction_id = request.transaction_id.trim().to_string();
        if transaction_id.is_empty() {
            return Err(DomainError::Validation(
                "transaction_id is required".to_string(),
            ));
        }
        let request = PostTransaction {
            transaction_id,
            ..request
        };
        let transaction_type = request.transaction_type;

        match self.wallets.post_transaction(request).await {
            Ok(posted) => {
                if posted.created {
                    counter!("wallet_transactions_total", "type" => transaction_type.to_string())
                        .increment(1);
                    tracing::info!(
                        "Posted {} {} for user {} (balance {})",
                        posted.transaction.transaction_type,
                        posted.transaction.amount_paise,
                        posted.transaction.user_id,
                        posted.transaction.balance_after_paise
                    );
                } else {
                    tracing::debug!(
                        "Replayed wallet transaction {}",
                        posted.transaction.transaction_id
                    );
                }
                Ok(posted)
            }
            Err(e) => {
                let err = DomainError::from(e);
                if matches!(err, DomainError::InsufficientFunds { .. }) {
                    counter!("wallet_insufficient_funds_total").increment(1);
                    tracing::warn!("Wallet transaction rejected: {}", err);
                }
                Err(err)
            }
        }
    }

    pub async fn system_wallets(
        &self,
        requester: &Requester,
    ) -> Result<Vec<SystemWallet>, DomainError> {
        ensure_super_admin(requester)?;
        Ok(self.wallets.list_system_wallets().await?)
    }

    pub async fn adjust_system_wallet(
        &self,
        requester: &Requester,
        wallet_type: SystemWalletType,
        delta_paise: i64,
    ) -> Result<SystemWallet, DomainError> {
        ensure_super_admin(requester)?;
        if delta_paise == 0 {
            return Err(DomainError::Validation(
                "Adjustment amount must be non-zero".to_string(),
            ));
        }
        let wallet = self
            .wallets
            .adjust_system_wallet(wallet_type, delta_paise)
            .await?;
        tracing::info!(
            "System wallet {} adjusted by {} to {}",
            wallet_type,
            delta_paise,
            wallet.balance_paise
        );
        Ok(wallet)
    }
}
