// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::billing_log::BillingStatus;
use crate::domain::models::price_plan::MessageCategory;

/// 仓库层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 唯一约束冲突
    #[error("Conflict: {0}")]
    Conflict(String),
    /// 领域规则拒绝（在事务内检测到）
    #[error(transparent)]
    Domain(Box<DomainError>),
}

impl From<DomainError> for RepositoryError {
    fn from(err: DomainError) -> Self {
        RepositoryError::Domain(Box::new(err))
    }
}

/// 领域错误类型
///
/// 服务层返回的错误，由表示层映射为 HTTP 状态码
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{category} rate {requested_paise} is below the floor of {floor_paise} paise")]
    BelowFloorPrice {
        category: MessageCategory,
        floor_paise: i64,
        requested_paise: i64,
    },

    #[error("No price plan available for user {0}")]
    NoPlanAvailable(Uuid),

    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: i64, required: i64 },

    #[error("Cannot change billing status from {from} to {to}")]
    InvalidStatusTransition {
        from: BillingStatus,
        to: BillingStatus,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(e) => DomainError::Database(e.to_string()),
            RepositoryError::NotFound => DomainError::NotFound("Record".to_string()),
            RepositoryError::Conflict(msg) => DomainError::Conflict(msg),
            RepositoryError::Domain(e) => *e,
        }
    }
}
