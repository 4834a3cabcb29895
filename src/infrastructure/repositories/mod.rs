// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 基于 SeaORM 的领域仓库实现。涉及余额与状态的写操作都在事务内完成，
/// 并对目标行加排他锁。
pub mod billing_log_repo_impl;
pub mod contact_repo_impl;
pub mod price_plan_repo_impl;
pub mod user_repo_impl;
pub mod wallet_repo_impl;

mod support;
