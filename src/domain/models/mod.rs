// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 用户与租户关系（user）
/// - 价格方案、覆盖价与分配记录（price_plan）
/// - 会话计费记录（billing_log）
/// - 钱包账户、流水与系统钱包（wallet）
/// - 联系人（contact）
/// - WhatsApp webhook 推送体（webhook）
pub mod billing_log;
pub mod contact;
pub mod price_plan;
pub mod user;
pub mod wallet;
pub mod webhook;
