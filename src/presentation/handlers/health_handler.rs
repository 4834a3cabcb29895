// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{response::IntoResponse, Json};
use serde_json::json;

/// 健康检查
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// 版本信息
pub async fn version() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
