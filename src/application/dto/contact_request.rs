// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::contact::{ContactPatch, NewContact};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 6, max = 20))]
    pub phone_number: String,
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<ContactRequest> for NewContact {
    fn from(req: ContactRequest) -> Self {
        NewContact {
            phone_number: req.phone_number,
            name: req.name,
            email: req.email,
            tags: req.tags,
        }
    }
}

/// 显式的部分更新字段
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactPatchRequest {
    #[validate(length(min = 6, max = 20))]
    pub phone_number: Option<String>,
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl From<ContactPatchRequest> for ContactPatch {
    fn from(req: ContactPatchRequest) -> Self {
        ContactPatch {
            phone_number: req.phone_number,
            name: req.name,
            email: req.email,
            tags: req.tags,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactQuery {
    #[validate(range(min = 1))]
    pub page: Option<u64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
    pub search: Option<String>,
}

/// 批量导入
#[derive(Debug, Deserialize, Validate)]
pub struct ImportContactsRequest {
    #[validate(length(min = 1, max = 5000), nested)]
    pub contacts: Vec<ContactRequest>,
}
