// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{sea_query::LikeExpr, DbErr, SqlErr};
use std::str::FromStr;

use crate::utils::errors::RepositoryError;

pub(crate) fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

/// 解析字符串枚举列；CHECK 约束保证合法，非法值视为数据损坏
pub(crate) fn parse_column<T: FromStr>(column: &str, value: &str) -> Result<T, RepositoryError> {
    value.parse().map_err(|_| {
        RepositoryError::Database(DbErr::Type(format!(
            "Unexpected value '{}' in column {}",
            value, column
        )))
    })
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// 唯一约束冲突映射为 `Conflict`，其余保持为数据库错误
pub(crate) fn conflict_or(err: DbErr, message: &str) -> RepositoryError {
    if is_unique_violation(&err) {
        RepositoryError::Conflict(message.to_string())
    } else {
        RepositoryError::Database(err)
    }
}

/// 页码从 1 开始，sea-orm 分页器从 0 开始
pub(crate) fn page_index(page: u64) -> u64 {
    page.saturating_sub(1)
}

/// 不区分大小写的子串匹配模式，`\`、`%`、`_` 按字面量匹配
pub(crate) fn contains_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.to_lowercase().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}
