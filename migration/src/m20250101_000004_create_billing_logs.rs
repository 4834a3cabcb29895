// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_users::Users;
use crate::m20250101_000002_create_price_plans::PricePlans;
use crate::m20250101_000003_create_wallets::WalletTransactions;

/// 会话计费日志表
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BillingLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BillingLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BillingLogs::UserId).uuid().not_null())
                    .col(ColumnDef::new(BillingLogs::ConversationId).string().not_null())
                    .col(
                        ColumnDef::new(BillingLogs::Category)
                            .string()
                            .not_null()
                            .check(Expr::col(BillingLogs::Category).is_in([
                                "utility",
                                "marketing",
                                "authentication",
                                "service",
                            ])),
                    )
                    .col(ColumnDef::new(BillingLogs::RecipientNumber).string().not_null())
                    .col(ColumnDef::new(BillingLogs::CountryCode).string().null())
                    .col(
                        ColumnDef::new(BillingLogs::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BillingLogs::EndTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(BillingLogs::BillingStatus)
                            .string()
                            .not_null()
                            .default("pending")
                            .check(
                                Expr::col(BillingLogs::BillingStatus)
                                    .is_in(["pending", "paid", "failed"]),
                            ),
                    )
                    .col(
                        ColumnDef::new(BillingLogs::AmountPaise)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(BillingLogs::AmountPaise).gte(0)),
                    )
                    .col(
                        ColumnDef::new(BillingLogs::Currency)
                            .string()
                            .not_null()
                            .default("INR"),
                    )
                    .col(ColumnDef::new(BillingLogs::PricePlanId).uuid().null())
                    .col(ColumnDef::new(BillingLogs::WalletTxId).uuid().null())
                    .col(
                        ColumnDef::new(BillingLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BillingLogs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_billing_logs_user")
                            .from(BillingLogs::Table, BillingLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_billing_logs_price_plan")
                            .from(BillingLogs::Table, BillingLogs::PricePlanId)
                            .to(PricePlans::Table, PricePlans::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_billing_logs_wallet_tx")
                            .from(BillingLogs::Table, BillingLogs::WalletTxId)
                            .to(WalletTransactions::Table, WalletTransactions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_billing_logs_user_conversation")
                    .table(BillingLogs::Table)
                    .col(BillingLogs::UserId)
                    .col(BillingLogs::ConversationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_billing_logs_user_start_time")
                    .table(BillingLogs::Table)
                    .col(BillingLogs::UserId)
                    .col(BillingLogs::StartTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BillingLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BillingLogs {
    Table,
    Id,
    UserId,
    ConversationId,
    Category,
    RecipientNumber,
    CountryCode,
    StartTime,
    EndTime,
    BillingStatus,
    AmountPaise,
    Currency,
    PricePlanId,
    WalletTxId,
    CreatedAt,
    UpdatedAt,
}
