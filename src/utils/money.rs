// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use crate::utils::errors::DomainError;

/// 小于该值的价格输入视为整币单位（卢比），需乘以 100
pub const WHOLE_CURRENCY_THRESHOLD: f64 = 10.0;

/// 价格输入
///
/// 接受 JSON 数字或数字字符串，例如 `1.15`、`"1.15"`、`115`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    /// 将输入归一化为 paise
    pub fn to_paise(&self) -> Result<i64, DomainError> {
        match self {
            PriceInput::Number(value) => normalize_price_input(*value),
            PriceInput::Text(text) => {
                let value: f64 = text.trim().parse().map_err(|_| {
                    DomainError::Validation(format!("Invalid price value: {}", text))
                })?;
                normalize_price_input(value)
            }
        }
    }
}

impl From<i64> for PriceInput {
    fn from(value: i64) -> Self {
        PriceInput::Number(value as f64)
    }
}

/// 价格输入归一化
///
/// 小于 10 的值按整币单位处理并乘以 100，大于等于 10 的值视为已是 paise。
/// 8 paise 与 0.08 卢比因此无法区分，这一规则沿用现有产品行为。
pub fn normalize_price_input(value: f64) -> Result<i64, DomainError> {
    if !value.is_finite() {
        return Err(DomainError::Validation(
            "Price must be a finite number".to_string(),
        ));
    }
    if value < 0.0 {
        return Err(DomainError::Validation(
            "Price cannot be negative".to_string(),
        ));
    }

    let paise = if value < WHOLE_CURRENCY_THRESHOLD {
        (value * 100.0).round()
    } else {
        value.round()
    };

    // i64::MAX as f64 向上取整到 2^63，等于它也已越界
    if paise >= i64::MAX as f64 {
        return Err(DomainError::Validation(format!(
            "Price is out of range: {}",
            value
        )));
    }

    Ok(paise as i64)
}

/// 将 paise 格式化为保留三位小数的主币单位字符串，例如 `115` -> `"1.150"`
pub fn format_major_units(paise: i64) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    format!("{}{}.{:02}0", sign, abs / 100, abs % 100)
}
