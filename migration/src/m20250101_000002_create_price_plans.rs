// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_users::Users;

const CATEGORIES: [&str; 4] = ["utility", "marketing", "authentication", "service"];

/// 价格方案、国家覆盖价与用户方案分配表
#[derive(DeriveMigrationName)]
pub struct Migration;

fn rate_column(col: PricePlans) -> ColumnDef {
    let mut def = ColumnDef::new(col.clone());
    def.big_integer()
        .not_null()
        .default(0)
        .check(Expr::col(col).gte(0));
    def
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PricePlans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PricePlans::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PricePlans::Name).string().not_null().unique_key())
                    .col(rate_column(PricePlans::UtilityPaise))
                    .col(rate_column(PricePlans::MarketingPaise))
                    .col(rate_column(PricePlans::AuthenticationPaise))
                    .col(rate_column(PricePlans::ServicePaise))
                    .col(
                        ColumnDef::new(PricePlans::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(PricePlans::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(PricePlans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PricePlans::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_price_plans_created_by")
                            .from(PricePlans::Table, PricePlans::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Only one row may carry the default flag
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_price_plans_single_default \
                 ON price_plans (is_default) WHERE is_default",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PricePlanOverrides::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PricePlanOverrides::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PricePlanOverrides::PlanId).uuid().not_null())
                    .col(ColumnDef::new(PricePlanOverrides::CountryCode).string().not_null())
                    .col(
                        ColumnDef::new(PricePlanOverrides::Category)
                            .string()
                            .not_null()
                            .check(Expr::col(PricePlanOverrides::Category).is_in(CATEGORIES)),
                    )
                    .col(
                        ColumnDef::new(PricePlanOverrides::AmountPaise)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(PricePlanOverrides::AmountPaise).gte(0)),
                    )
                    .col(
                        ColumnDef::new(PricePlanOverrides::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PricePlanOverrides::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_price_plan_overrides_plan")
                            .from(PricePlanOverrides::Table, PricePlanOverrides::PlanId)
                            .to(PricePlans::Table, PricePlans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_price_plan_overrides_unique")
                    .table(PricePlanOverrides::Table)
                    .col(PricePlanOverrides::PlanId)
                    .col(PricePlanOverrides::CountryCode)
                    .col(PricePlanOverrides::Category)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserPricePlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserPricePlans::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserPricePlans::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserPricePlans::PricePlanId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserPricePlans::EffectiveFrom)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserPricePlans::AssignedBy).uuid().null())
                    .col(
                        ColumnDef::new(UserPricePlans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_price_plans_user")
                            .from(UserPricePlans::Table, UserPricePlans::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_price_plans_plan")
                            .from(UserPricePlans::Table, UserPricePlans::PricePlanId)
                            .to(PricePlans::Table, PricePlans::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_price_plans_user_effective")
                    .table(UserPricePlans::Table)
                    .col(UserPricePlans::UserId)
                    .col(UserPricePlans::EffectiveFrom)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserPricePlans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PricePlanOverrides::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PricePlans::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone)]
pub(crate) enum PricePlans {
    Table,
    Id,
    Name,
    UtilityPaise,
    MarketingPaise,
    AuthenticationPaise,
    ServicePaise,
    IsDefault,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PricePlanOverrides {
    Table,
    Id,
    PlanId,
    CountryCode,
    Category,
    AmountPaise,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserPricePlans {
    Table,
    Id,
    UserId,
    PricePlanId,
    EffectiveFrom,
    AssignedBy,
    CreatedAt,
}
