// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use super::success;
use crate::application::context::AppContext;
use crate::application::dto::billing_request::{
    LogQuery, RecordChargeRequest, UpdateStatusRequest,
};
use crate::domain::models::user::Requester;
use crate::domain::services::billing_service::LogView;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::{AppJson, AppPath, AppQuery};

async fn list_view(
    ctx: &AppContext,
    requester: &Requester,
    view: LogView,
    query: LogQuery,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;
    let paging = query.paging();
    let listing = ctx
        .billing
        .list(
            requester,
            view,
            query.criteria(),
            paging.page(),
            paging.limit(),
        )
        .await?;
    Ok(success(listing))
}

async fn export_view(
    ctx: &AppContext,
    requester: &Requester,
    view: LogView,
    query: LogQuery,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;
    let csv = ctx
        .billing
        .export_csv(requester, view, query.criteria())
        .await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"billing_logs.csv\"",
            ),
        ],
        csv,
    ))
}

/// 调用方自己的计费日志
pub async fn list_own(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppQuery(query): AppQuery<LogQuery>,
) -> Result<impl IntoResponse, AppError> {
    list_view(&ctx, &requester, LogView::Own, query).await
}

pub async fn export_own(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppQuery(query): AppQuery<LogQuery>,
) -> Result<impl IntoResponse, AppError> {
    export_view(&ctx, &requester, LogView::Own, query).await
}

/// 全部租户的计费日志，仅超级管理员
pub async fn list_all(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppQuery(query): AppQuery<LogQuery>,
) -> Result<impl IntoResponse, AppError> {
    list_view(&ctx, &requester, LogView::All, query).await
}

pub async fn export_all(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppQuery(query): AppQuery<LogQuery>,
) -> Result<impl IntoResponse, AppError> {
    export_view(&ctx, &requester, LogView::All, query).await
}

/// 受管子用户的计费日志
pub async fn list_managed(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppQuery(query): AppQuery<LogQuery>,
) -> Result<impl IntoResponse, AppError> {
    list_view(&ctx, &requester, LogView::Managed, query).await
}

pub async fn export_managed(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppQuery(query): AppQuery<LogQuery>,
) -> Result<impl IntoResponse, AppError> {
    export_view(&ctx, &requester, LogView::Managed, query).await
}

/// 手工计费。新记录返回 201，重复会话返回 200 与已有记录
pub async fn record_charge(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppJson(payload): AppJson<RecordChargeRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let outcome = ctx
        .billing
        .record_charge_as(&requester, payload.into_command()?)
        .await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, success(outcome.log)))
}

pub async fn update_status(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let log = ctx
        .billing
        .update_status(&requester, id, payload.status)
        .await?;
    Ok(success(log))
}
