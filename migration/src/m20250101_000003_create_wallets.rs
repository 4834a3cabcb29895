// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_users::Users;

const TRANSACTION_TYPES: [&str; 6] = [
    "RECHARGE",
    "DEBIT",
    "REFUND",
    "ADJUSTMENT",
    "SUSPENSE_DEBIT",
    "SUSPENSE_REFUND",
];

/// 钱包账户、钱包流水与系统钱包
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WalletAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WalletAccounts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WalletAccounts::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(WalletAccounts::BalancePaise)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(WalletAccounts::BalancePaise).gte(0)),
                    )
                    .col(
                        ColumnDef::new(WalletAccounts::Currency)
                            .string()
                            .not_null()
                            .default("INR"),
                    )
                    .col(
                        ColumnDef::new(WalletAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WalletAccounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wallet_accounts_user")
                            .from(WalletAccounts::Table, WalletAccounts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WalletTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WalletTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::TransactionId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(WalletTransactions::UserId).uuid().not_null())
                    .col(ColumnDef::new(WalletTransactions::WalletId).uuid().not_null())
                    .col(
                        ColumnDef::new(WalletTransactions::TransactionType)
                            .string()
                            .not_null()
                            .check(
                                Expr::col(WalletTransactions::TransactionType)
                                    .is_in(TRANSACTION_TYPES),
                            ),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::AmountPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::BalanceAfterPaise)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(WalletTransactions::BalanceAfterPaise).gte(0)),
                    )
                    .col(ColumnDef::new(WalletTransactions::Description).string().null())
                    .col(ColumnDef::new(WalletTransactions::ReferenceId).string().null())
                    .col(
                        ColumnDef::new(WalletTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_wallet_transactions_wallet")
                            .from(WalletTransactions::Table, WalletTransactions::WalletId)
                            .to(WalletAccounts::Table, WalletAccounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_wallet_transactions_user_created")
                    .table(WalletTransactions::Table)
                    .col(WalletTransactions::UserId)
                    .col(WalletTransactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SystemWallets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SystemWallets::WalletType)
                            .string()
                            .not_null()
                            .primary_key()
                            .check(Expr::col(SystemWallets::WalletType).is_in(["main", "reserve"])),
                    )
                    .col(
                        ColumnDef::new(SystemWallets::BalancePaise)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(SystemWallets::BalancePaise).gte(0)),
                    )
                    .col(
                        ColumnDef::new(SystemWallets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed the singleton wallets
        let seed = Query::insert()
            .into_table(SystemWallets::Table)
            .columns([SystemWallets::WalletType, SystemWallets::BalancePaise])
            .values_panic(["main".into(), 0i64.into()])
            .values_panic(["reserve".into(), 0i64.into()])
            .on_conflict(
                OnConflict::column(SystemWallets::WalletType)
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned();

        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemWallets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WalletTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WalletAccounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum WalletAccounts {
    Table,
    Id,
    UserId,
    BalancePaise,
    Currency,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum WalletTransactions {
    Table,
    Id,
    TransactionId,
    UserId,
    WalletId,
    TransactionType,
    AmountPaise,
    BalanceAfterPaise,
    Description,
    ReferenceId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SystemWallets {
    Table,
    WalletType,
    BalancePaise,
    UpdatedAt,
}
