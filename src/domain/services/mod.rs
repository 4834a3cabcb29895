// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务，这些服务封装了业务规则，
/// 通过仓库特质访问持久化层。
///
/// 包含的服务：
/// - 授权服务（access_service）：按角色与租户关系判断数据可见性
/// - 认证服务（auth_service）：注册、登录与令牌校验
/// - 计费服务（billing_service）：会话计费、查询、汇总与 CSV 导出
/// - 联系人服务（contact_service）：联系人 CRUD 与批量导入
/// - 方案服务（plan_service）：方案创建（含底价校验）、默认方案与分配
/// - 定价服务（pricing_service）：解析用户在某类别下的单价
/// - 租户管理服务（user_service）：审批、停用与父子关系
/// - 钱包服务（wallet_service）：余额查询与记账
/// - WhatsApp webhook 服务（webhook_service）：签名校验与状态回调计费
pub mod access_service;
pub mod auth_service;
pub mod billing_service;
pub mod contact_service;
pub mod plan_service;
pub mod pricing_service;
pub mod user_service;
pub mod wallet_service;
pub mod webhook_service;
