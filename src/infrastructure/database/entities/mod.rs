// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库实体模块
///
/// 定义数据库表对应的实体结构，使用 SeaORM 进行对象关系映射。
/// 枚举列以字符串存储，由领域模型的 FromStr/Display 负责转换。
pub mod billing_log;
pub mod contact;
pub mod price_plan;
pub mod price_plan_override;
pub mod system_wallet;
pub mod user;
pub mod user_price_plan;
pub mod user_relationship;
pub mod wallet_account;
pub mod wallet_transaction;
