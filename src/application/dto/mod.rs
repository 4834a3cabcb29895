// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义 HTTP 请求体与查询参数，使用 validator 在边界处校验，
/// 再转换为领域层的命令类型
pub mod admin_request;
pub mod auth_request;
pub mod billing_request;
pub mod contact_request;
pub mod pagination;
pub mod plan_request;
pub mod wallet_request;
