// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use validator::Validate;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;

/// 分页查询参数
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PageQuery {
    /// 页码，从 1 开始
    #[validate(range(min = 1))]
    pub page: Option<u64>,

    /// 每页条数，最大 100
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
    }
}
