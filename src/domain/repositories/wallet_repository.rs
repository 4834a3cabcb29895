// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::wallet::{
    PostTransaction, PostedTransaction, SystemWallet, SystemWalletType, WalletAccount,
    WalletTransaction,
};
use crate::utils::errors::RepositoryError;

/// 钱包仓库特质
///
/// `post_transaction` 在一个事务内锁定账户行、计算新余额、写回账户并追加流水
#[async_trait]
pub trait WalletRepository: Send + Sync {
    async fn find_account(&self, user_id: Uuid) -> Result<Option<WalletAccount>, RepositoryError>;

    /// 记账。相同 `transaction_id` 的重放返回已有流水，参数不一致时返回 `Conflict`
    async fn post_transaction(
        &self,
        request: PostTransaction,
    ) -> Result<PostedTransaction, RepositoryError>;

    /// 按时间倒序列出流水
    async fn list_transactions(
        &self,
        user_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<WalletTransaction>, u64), RepositoryError>;

    async fn list_system_wallets(&self) -> Result<Vec<SystemWallet>, RepositoryError>;

    /// 按带符号增量调整系统钱包，余额不能为负
    async fn adjust_system_wallet(
        &self,
        wallet_type: SystemWalletType,
        delta_paise: i64,
    ) -> Result<SystemWallet, RepositoryError>;
}
