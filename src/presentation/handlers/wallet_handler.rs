// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use super::success;
use crate::application::context::AppContext;
use crate::application::dto::pagination::PageQuery;
use crate::application::dto::wallet_request::{AdjustSystemWalletRequest, PostTransactionRequest};
use crate::domain::models::user::Requester;
use crate::domain::models::wallet::SystemWalletType;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::{AppJson, AppPath, AppQuery};
use crate::utils::errors::DomainError;

pub async fn my_wallet(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success(ctx.wallets.summary(&requester, requester.id).await?))
}

pub async fn my_transactions(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppQuery(query): AppQuery<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;
    let page = ctx
        .wallets
        .transactions(&requester, requester.id, query.page(), query.limit())
        .await?;
    Ok(success(page))
}

pub async fn user_wallet(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(user_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success(ctx.wallets.summary(&requester, user_id).await?))
}

pub async fn user_transactions(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(user_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;
    let page = ctx
        .wallets
        .transactions(&requester, user_id, query.page(), query.limit())
        .await?;
    Ok(success(page))
}

/// 管理员记账。新流水返回 201，幂等重放返回 200
pub async fn post_transaction(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(user_id): AppPath<Uuid>,
    AppJson(payload): AppJson<PostTransactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let posted = ctx
        .wallets
        .post(&requester, payload.into_post(user_id))
        .await?;
    let status = if posted.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, success(posted.transaction)))
}

pub async fn system_wallets(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success(ctx.wallets.system_wallets(&requester).await?))
}

pub async fn adjust_system_wallet(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(wallet_type): AppPath<String>,
    AppJson(payload): AppJson<AdjustSystemWalletRequest>,
) -> Result<impl IntoResponse, AppError> {
    let wallet_type: SystemWalletType = wallet_type.parse().map_err(|_| {
        DomainError::NotFound(format!("System wallet '{}'", wallet_type))
    })?;
    let wallet = ctx
        .wallets
        .adjust_system_wallet(&requester, wallet_type, payload.delta_paise)
        .await?;
    Ok(success(wallet))
}
