// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 包含各个API端点的具体处理逻辑。成功响应统一为
/// `{"success": true, "data": ...}`，错误由 `AppError` 渲染
pub mod admin_handler;
pub mod auth_handler;
pub mod billing_handler;
pub mod contact_handler;
pub mod health_handler;
pub mod plan_handler;
pub mod wallet_handler;
pub mod webhook_handler;

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

pub(crate) fn success<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

pub(crate) fn created<T: Serialize>(data: T) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, success(data))
}
