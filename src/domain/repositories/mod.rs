// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层基于 sea-orm 提供。
///
/// 包含的仓库接口：
/// - 用户仓库（user_repository）：用户与父子租户关系
/// - 价格方案仓库（price_plan_repository）：方案、覆盖价与分配历史
/// - 钱包仓库（wallet_repository）：钱包账户、流水与系统钱包
/// - 计费日志仓库（billing_log_repository）：会话计费记录的写入、查询与汇总
/// - 联系人仓库（contact_repository）：联系人 CRUD 与批量导入
pub mod billing_log_repository;
pub mod contact_repository;
pub mod price_plan_repository;
pub mod user_repository;
pub mod wallet_repository;
