// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::contact::{Contact, ContactPatch, ImportSummary, NewContact};
use crate::utils::errors::RepositoryError;

/// 联系人仓库特质，所有操作都限定在 `user_id` 之内
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn list(
        &self,
        user_id: Uuid,
        search: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Contact>, u64), RepositoryError>;

    /// 同一用户下号码重复时返回 `Conflict`
    async fn create(&self, user_id: Uuid, contact: NewContact) -> Result<Contact, RepositoryError>;

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: ContactPatch,
    ) -> Result<Contact, RepositoryError>;

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), RepositoryError>;

    /// 按 (user_id, phone_number) 批量插入或更新
    async fn bulk_upsert(
        &self,
        user_id: Uuid,
        contacts: Vec<NewContact>,
    ) -> Result<ImportSummary, RepositoryError>;
}
