// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：用户、价格方案、计费日志、钱包等核心实体
/// - 仓库接口（repositories）：数据持久化抽象接口
/// - 服务（services）：定价、授权、记账与计费规则
///
/// 领域层只依赖仓库特质，具体存储由基础设施层实现。
pub mod models;
pub mod repositories;
pub mod services;
