// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    body::Bytes,
    extract::Extension,
    http::HeaderMap,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::success;
use crate::application::context::AppContext;
use crate::domain::models::webhook::WhatsAppNotification;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::AppQuery;
use crate::utils::errors::DomainError;

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Meta 订阅握手参数
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// 订阅握手，校验通过后原样回显 challenge
pub async fn verify(
    Extension(ctx): Extension<AppContext>,
    AppQuery(query): AppQuery<VerifyQuery>,
) -> Result<impl IntoResponse, AppError> {
    let challenge = ctx.webhooks.verify_subscription(
        query.mode.as_deref(),
        query.verify_token.as_deref(),
        query.challenge.as_deref(),
    )?;
    info!("WhatsApp webhook subscription verified");
    Ok(challenge)
}

/// 接收状态回调
///
/// 签名基于原始请求体计算，因此先校验签名再解析 JSON
pub async fn receive(
    Extension(ctx): Extension<AppContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    ctx.webhooks.verify_payload(&body, signature)?;

    let notification: WhatsAppNotification = serde_json::from_slice(&body).map_err(|e| {
        warn!("Malformed webhook payload: {}", e);
        DomainError::Validation(format!("Malformed webhook payload: {}", e))
    })?;

    let report = ctx.webhooks.ingest(notification).await?;
    Ok(success(report))
}
