// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::Extension,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use super::{created, success};
use crate::application::context::AppContext;
use crate::application::dto::plan_request::{
    AssignPlanRequest, CreatePlanRequest, OverrideRequest, UpdatePlanRequest,
};
use crate::domain::models::user::Requester;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::{AppJson, AppPath};

pub async fn list_plans(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success(ctx.plans.list(&requester).await?))
}

/// 创建方案，聚合商受底价约束且不能设为默认
pub async fn create_plan(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppJson(payload): AppJson<CreatePlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let plan = ctx
        .plans
        .create(&requester, payload.into_command()?)
        .await?;
    Ok(created(plan))
}

pub async fn update_plan(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdatePlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let plan = ctx
        .plans
        .update(&requester, id, payload.into_patch()?)
        .await?;
    Ok(success(plan))
}

pub async fn set_default_plan(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success(ctx.plans.set_default(&requester, id).await?))
}

pub async fn list_overrides(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success(ctx.plans.list_overrides(&requester, id).await?))
}

pub async fn upsert_override(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<OverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let amount = payload.amount.to_paise()?;
    let entry = ctx
        .plans
        .upsert_override(
            &requester,
            id,
            &payload.country_code,
            payload.category,
            amount,
        )
        .await?;
    Ok(success(entry))
}

pub async fn assign_plan(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(user_id): AppPath<Uuid>,
    AppJson(payload): AppJson<AssignPlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let assignment = ctx
        .plans
        .assign(&requester, user_id, payload.plan_id, payload.effective_from)
        .await?;
    Ok(created(assignment))
}

pub async fn get_user_plan(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(user_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(success(ctx.plans.current_plan_for(&requester, user_id).await?))
}
