// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_price_plans;
mod m20250101_000003_create_wallets;
mod m20250101_000004_create_billing_logs;
mod m20250101_000005_create_contacts;
mod m20250115_000001_add_suspense_balances;

/// 数据库迁移器
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    /// 获取所有迁移
    ///
    /// # 返回值
    ///
    /// 返回迁移列表
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_price_plans::Migration),
            Box::new(m20250101_000003_create_wallets::Migration),
            Box::new(m20250101_000004_create_billing_logs::Migration),
            Box::new(m20250101_000005_create_contacts::Migration),
            Box::new(m20250115_000001_add_suspense_balances::Migration),
        ]
    }
}
