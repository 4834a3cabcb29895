// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, error};
use validator::ValidationErrors;

use crate::utils::errors::{DomainError, RepositoryError};

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn classify(&self) -> (StatusCode, String, Option<Value>) {
        if let Some(errors) = self.0.downcast_ref::<ValidationErrors>() {
            return (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                serde_json::to_value(errors).ok(),
            );
        }

        let domain = match self.0.downcast_ref::<DomainError>() {
            Some(err) => err.clone(),
            None => match self.0.downcast_ref::<RepositoryError>() {
                Some(RepositoryError::Database(e)) => DomainError::Database(e.to_string()),
                Some(RepositoryError::NotFound) => DomainError::NotFound("Record".to_string()),
                Some(RepositoryError::Conflict(msg)) => DomainError::Conflict(msg.clone()),
                Some(RepositoryError::Domain(e)) => e.as_ref().clone(),
                None => DomainError::Database(self.0.to_string()),
            },
        };

        let status = status_for(&domain);
        let message = match &domain {
            DomainError::Database(detail) => {
                error!("Request failed with an internal error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let details = match &domain {
            DomainError::BelowFloorPrice {
                category,
                floor_paise,
                requested_paise,
            } => Some(json!({
                "category": category,
                "floor_paise": floor_paise,
                "requested_paise": requested_paise,
            })),
            DomainError::InsufficientFunds {
                available,
                required,
            } => Some(json!({
                "available_paise": available,
                "required_paise": required,
            })),
            _ => None,
        };

        (status, message, details)
    }
}

/// 领域错误到 HTTP 状态码
pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_)
        | DomainError::BelowFloorPrice { .. }
        | DomainError::NoPlanAvailable(_)
        | DomainError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
        DomainError::Authentication(_) => StatusCode::UNAUTHORIZED,
        DomainError::Authorization(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) | DomainError::InvalidStatusTransition { .. } => {
            StatusCode::CONFLICT
        }
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = self.classify();
        if status.is_client_error() {
            debug!("Request rejected with {}: {}", status, message);
        }

        let mut body = json!({ "success": false, "error": message });
        if let Some(details) = details {
            body["details"] = details;
        }
        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
