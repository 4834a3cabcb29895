// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 用户与租户关系表
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("user")
                            .check(Expr::col(Users::Role).is_in(["user", "aggregator", "super_admin"])),
                    )
                    .col(
                        ColumnDef::new(Users::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::WhatsappPhoneNumberId)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create user_relationships table
        manager
            .create_table(
                Table::create()
                    .table(UserRelationships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserRelationships::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserRelationships::ParentUserId).uuid().not_null())
                    .col(ColumnDef::new(UserRelationships::ChildUserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserRelationships::RelationshipType)
                            .string()
                            .not_null()
                            .check(
                                Expr::col(UserRelationships::RelationshipType)
                                    .is_in(["business", "aggregator"]),
                            ),
                    )
                    .col(
                        ColumnDef::new(UserRelationships::Status)
                            .string()
                            .not_null()
                            .default("active")
                            .check(Expr::col(UserRelationships::Status).is_in(["active", "inactive"])),
                    )
                    .col(
                        ColumnDef::new(UserRelationships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UserRelationships::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_relationships_parent")
                            .from(UserRelationships::Table, UserRelationships::ParentUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_relationships_child")
                            .from(UserRelationships::Table, UserRelationships::ChildUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_relationships_parent_child")
                    .table(UserRelationships::Table)
                    .col(UserRelationships::ParentUserId)
                    .col(UserRelationships::ChildUserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserRelationships::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    IsApproved,
    IsActive,
    WhatsappPhoneNumberId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserRelationships {
    Table,
    Id,
    ParentUserId,
    ChildUserId,
    RelationshipType,
    Status,
    CreatedAt,
    UpdatedAt,
}
