// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 安全模块
///
/// - JWT 令牌签发与校验（jwt）
/// - argon2 密码哈希（password）
/// - webhook 签名校验（signature）
pub mod jwt;
pub mod password;
pub mod signature;
