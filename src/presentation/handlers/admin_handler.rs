// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::Extension,
    response::IntoResponse,
};
use uuid::Uuid;

use super::success;
use crate::application::context::AppContext;
use crate::application::dto::admin_request::{
    ActiveRequest, ApprovalRequest, LinkRequest, RelationshipStatusRequest,
};
use crate::domain::models::user::Requester;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::{AppJson, AppPath};

pub async fn list_users(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success(ctx.users.list(&requester).await?))
}

pub async fn set_approval(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ApprovalRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = ctx
        .users
        .set_approval(&requester, id, payload.approved)
        .await?;
    Ok(success(user))
}

pub async fn set_active(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ActiveRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = ctx.users.set_active(&requester, id, payload.active).await?;
    Ok(success(user))
}

pub async fn link(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppJson(payload): AppJson<LinkRequest>,
) -> Result<impl IntoResponse, AppError> {
    let relationship = ctx
        .users
        .link(
            &requester,
            payload.parent_user_id,
            payload.child_user_id,
            payload.relationship_type,
        )
        .await?;
    Ok(success(relationship))
}

pub async fn set_relationship_status(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppJson(payload): AppJson<RelationshipStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let relationship = ctx
        .users
        .set_relationship_status(
            &requester,
            payload.parent_user_id,
            payload.child_user_id,
            payload.status,
        )
        .await?;
    Ok(success(relationship))
}
