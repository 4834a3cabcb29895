// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

use crate::m20250101_000003_create_wallets::{WalletAccounts, WalletTransactions};

/// 为钱包账户与流水添加挂账（suspense）余额字段
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    /// 仅在字段缺失时添加，重复执行不会报错
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager
            .has_column("wallet_accounts", "suspense_balance_paise")
            .await?
        {
            manager
                .alter_table(
                    Table::alter()
                        .table(WalletAccounts::Table)
                        .add_column(
                            ColumnDef::new(Suspense::SuspenseBalancePaise)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;
        }

        if !manager
            .has_column("wallet_transactions", "suspense_balance_after_paise")
            .await?
        {
            manager
                .alter_table(
                    Table::alter()
                        .table(WalletTransactions::Table)
                        .add_column(
                            ColumnDef::new(Suspense::SuspenseBalanceAfterPaise)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(WalletTransactions::Table)
                    .drop_column(Suspense::SuspenseBalanceAfterPaise)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(WalletAccounts::Table)
                    .drop_column(Suspense::SuspenseBalancePaise)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Suspense {
    SuspenseBalancePaise,
    SuspenseBalanceAfterPaise,
}
