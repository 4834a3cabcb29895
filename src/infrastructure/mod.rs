// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层
///
/// - database: 连接池、迁移与 SeaORM 实体
/// - repositories: 领域仓库的数据库实现
/// - security: JWT、密码哈希与 webhook 签名
/// - metrics: Prometheus 导出器
pub mod database;
pub mod metrics;
pub mod repositories;
pub mod security;
