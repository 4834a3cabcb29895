// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use wabill::domain::models::user::Role;
use wabill::domain::models::wallet::{PostTransaction, SystemWalletType, TransactionType};
use wabill::domain::repositories::wallet_repository::WalletRepository;
use wabill::infrastructure::repositories::wallet_repo_impl::WalletRepositoryImpl;
use wabill::utils::errors::{DomainError, RepositoryError};

use super::helpers::{create_user, remove_file_db, test_db, test_file_db};

fn post(user_id: Uuid, key: &str, transaction_type: TransactionType, amount: i64) -> PostTransaction {
    PostTransaction {
        transaction_id: key.to_string(),
        user_id,
        transaction_type,
        amount_paise: amount,
        description: None,
        reference_id: None,
    }
}

fn is_insufficient(err: &RepositoryError) -> bool {
    matches!(err, RepositoryError::Domain(e) if matches!(e.as_ref(), DomainError::InsufficientFunds { .. }))
}

#[tokio::test]
async fn test_recharge_then_debit_updates_balance_and_history() {
    let db = test_db().await;
    let user = create_user(&db, Role::User).await;
    let wallets = WalletRepositoryImpl::new(db.clone(), "INR");

    let recharge = wallets
        .post_transaction(post(user.id, "rc-1", TransactionType::Recharge, 10_000))
        .await
        .unwrap();
    assert!(recharge.created);
    assert_eq!(recharge.transaction.balance_after_paise, 10_000);

    let debit = wallets
        .post_transaction(post(user.id, "db-1", TransactionType::Debit, 2_500))
        .await
        .unwrap();
    assert_eq!(debit.transaction.balance_after_paise, 7_500);

    let account = wallets.find_account(user.id).await.unwrap().unwrap();
    assert_eq!(account.balance_paise, 7_500);
    assert_eq!(account.suspense_balance_paise, 0);
    assert_eq!(account.currency, "INR");

    let (items, total) = wallets.list_transactions(user.id, 1, 10).await.unwrap();
    assert_eq!(total, 2);
    let balances: Vec<i64> = items.iter().map(|t| t.balance_after_paise).collect();
    assert!(balances.contains(&10_000));
    assert!(balances.contains(&7_500));
}

#[tokio::test]
async fn test_insufficient_funds_leaves_no_trace() {
    let db = test_db().await;
    let user = create_user(&db, Role::User).await;
    let wallets = WalletRepositoryImpl::new(db.clone(), "INR");

    wallets
        .post_transaction(post(user.id, "rc-1", TransactionType::Recharge, 100))
        .await
        .unwrap();

    let err = wallets
        .post_transaction(post(user.id, "db-1", TransactionType::Debit, 101))
        .await
        .unwrap_err();
    assert!(is_insufficient(&err));

    let account = wallets.find_account(user.id).await.unwrap().unwrap();
    assert_eq!(account.balance_paise, 100);
    let (_, total) = wallets.list_transactions(user.id, 1, 10).await.unwrap();
    assert_eq!(total, 1);
}

#[tokio::test]
async fn test_replay_is_idempotent_and_mismatch_conflicts() {
    let db = test_db().await;
    let user = create_user(&db, Role::User).await;
    let wallets = WalletRepositoryImpl::new(db.clone(), "INR");

    let first = wallets
        .post_transaction(post(user.id, "rc-same", TransactionType::Recharge, 500))
        .await
        .unwrap();
    let replay = wallets
        .post_transaction(post(user.id, "rc-same", TransactionType::Recharge, 500))
        .await
        .unwrap();

    assert!(first.created);
    assert!(!replay.created);
    assert_eq!(first.transaction.id, replay.transaction.id);
    assert_eq!(
        wallets.find_account(user.id).await.unwrap().unwrap().balance_paise,
        500
    );

    let err = wallets
        .post_transaction(post(user.id, "rc-same", TransactionType::Recharge, 900))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));
}

#[tokio::test]
async fn test_concurrent_debits_never_overdraw() {
    let (db, path) = test_file_db(4).await;
    let user = create_user(&db, Role::User).await;
    let wallets = Arc::new(WalletRepositoryImpl::new(db.clone(), "INR"));

    wallets
        .post_transaction(post(user.id, "rc-1", TransactionType::Recharge, 1_000))
        .await
        .unwrap();

    let attempts = (0..5).map(|i| {
        let wallets = wallets.clone();
        let request = post(user.id, &format!("db-{}", i), TransactionType::Debit, 300);
        async move {
            // SQLite 写锁冲突时整笔事务回滚，重试即可
            let mut tries = 0;
            loop {
                match wallets.post_transaction(request.clone()).await {
                    Err(RepositoryError::Database(_)) if tries < 50 => {
                        tries += 1;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                    other => return other,
                }
            }
        }
    });
    let results = join_all(attempts).await;

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(e) if is_insufficient(e)))
        .count();
    assert_eq!(succeeded, 3);
    assert_eq!(rejected, 2);

    let account = wallets.find_account(user.id).await.unwrap().unwrap();
    assert_eq!(account.balance_paise, 100);

    let (items, total) = wallets.list_transactions(user.id, 1, 10).await.unwrap();
    assert_eq!(total, 4);
    let mut chain: Vec<i64> = items.iter().map(|t| t.balance_after_paise).collect();
    chain.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(chain, vec![1_000, 700, 400, 100]);

    remove_file_db(&path);
}

#[tokio::test]
async fn test_suspense_hold_and_release() {
    let db = test_db().await;
    let user = create_user(&db, Role::User).await;
    let wallets = WalletRepositoryImpl::new(db.clone(), "INR");

    wallets
        .post_transaction(post(user.id, "rc-1", TransactionType::Recharge, 1_000))
        .await
        .unwrap();
    let held = wallets
        .post_transaction(post(user.id, "hold-1", TransactionType::SuspenseDebit, 400))
        .await
        .unwrap();
    assert_eq!(held.transaction.balance_after_paise, 600);
    assert_eq!(held.transaction.suspense_balance_after_paise, 400);

    let released = wallets
        .post_transaction(post(user.id, "release-1", TransactionType::SuspenseRefund, 400))
        .await
        .unwrap();
    assert_eq!(released.transaction.balance_after_paise, 1_000);
    assert_eq!(released.transaction.suspense_balance_after_paise, 0);

    let err = wallets
        .post_transaction(post(user.id, "release-2", TransactionType::SuspenseRefund, 1))
        .await
        .unwrap_err();
    assert!(is_insufficient(&err));
}

#[tokio::test]
async fn test_system_wallet_adjustments() {
    let db = test_db().await;
    let wallets = WalletRepositoryImpl::new(db.clone(), "INR");

    let seeded = wallets.list_system_wallets().await.unwrap();
    assert_eq!(seeded.len(), 2);
    assert!(seeded.iter().all(|w| w.balance_paise == 0));

    let main = wallets
        .adjust_system_wallet(SystemWalletType::Main, 5_000)
        .await
        .unwrap();
    assert_eq!(main.balance_paise, 5_000);

    let main = wallets
        .adjust_system_wallet(SystemWalletType::Main, -2_000)
        .await
        .unwrap();
    assert_eq!(main.balance_paise, 3_000);

    let err = wallets
        .adjust_system_wallet(SystemWalletType::Reserve, -1)
        .await
        .unwrap_err();
    assert!(is_insufficient(&err));
}
