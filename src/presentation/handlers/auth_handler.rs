// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use super::{created, success};
use crate::application::context::AppContext;
use crate::application::dto::auth_request::{LoginRequest, RegisterRequest};
use crate::domain::models::user::User;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::AppJson;

/// 注册，新用户需等待管理员审批
pub async fn register(
    Extension(ctx): Extension<AppContext>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user = ctx.auth.register(payload.into()).await?;
    Ok(created(user))
}

pub async fn login(
    Extension(ctx): Extension<AppContext>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let session = ctx.auth.login(&payload.email, &payload.password).await?;
    Ok(success(json!({
        "token": session.token,
        "token_type": "Bearer",
        "expires_in": session.expires_in,
        "user": session.user,
    })))
}

pub async fn me(Extension(user): Extension<User>) -> impl IntoResponse {
    success(user)
}
