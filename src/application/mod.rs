// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// - dto: HTTP 边界上的请求对象与校验
/// - context: 由连接池与配置装配仓库和服务
pub mod context;
pub mod dto;
