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

use super::{created, success};
use crate::application::context::AppContext;
use crate::application::dto::contact_request::{
    ContactPatchRequest, ContactQuery, ContactRequest, ImportContactsRequest,
};
use crate::application::dto::pagination::PageQuery;
use crate::domain::models::user::Requester;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::{AppJson, AppPath, AppQuery};

pub async fn list_contacts(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppQuery(query): AppQuery<ContactQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;
    let paging = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let page = ctx
        .contacts
        .list(
            &requester,
            query.search.as_deref(),
            paging.page(),
            paging.limit(),
        )
        .await?;
    Ok(success(page))
}

pub async fn create_contact(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppJson(payload): AppJson<ContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let contact = ctx.contacts.create(&requester, payload.into()).await?;
    Ok(created(contact))
}

pub async fn update_contact(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ContactPatchRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let contact = ctx.contacts.update(&requester, id, payload.into()).await?;
    Ok(success(contact))
}

pub async fn delete_contact(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    ctx.contacts.delete(&requester, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 批量导入，按号码插入或更新
pub async fn import_contacts(
    Extension(ctx): Extension<AppContext>,
    Extension(requester): Extension<Requester>,
    AppJson(payload): AppJson<ImportContactsRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let contacts = payload.contacts.into_iter().map(Into::into).collect();
    let summary = ctx.contacts.import(&requester, contacts).await?;
    Ok(success(summary))
}
