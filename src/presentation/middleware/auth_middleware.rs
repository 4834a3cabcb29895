// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::domain::services::auth_service::AuthService;
use crate::presentation::errors::AppError;
use crate::utils::errors::DomainError;

/// 认证中间件
///
/// 校验 `Authorization: Bearer <jwt>`，重新加载用户并确认其仍可登录，
/// 然后把 `User` 与 `Requester` 注入请求扩展
pub async fn auth_middleware(
    State(auth): State<Arc<AuthService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| DomainError::Authentication("Missing bearer token".to_string()))?;

    let user = auth.authenticate(&token).await?;
    debug!("Authenticated user {} for {}", user.id, req.uri().path());

    req.extensions_mut().insert(user.as_requester());
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
#[path = "auth_middleware_test.rs"]
mod tests;
