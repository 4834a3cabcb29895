// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::user::{
    NewUser, RelationshipStatus, RelationshipType, User, UserRelationship,
};
use crate::utils::errors::RepositoryError;

/// 用户仓库特质
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// 按 WhatsApp phone_number_id 查找号码所属用户
    async fn find_by_phone_number_id(
        &self,
        phone_number_id: &str,
    ) -> Result<Option<User>, RepositoryError>;

    /// 创建用户，邮箱重复时返回 `Conflict`
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    async fn set_approval(&self, id: Uuid, approved: bool) -> Result<User, RepositoryError>;

    async fn set_active(&self, id: Uuid, active: bool) -> Result<User, RepositoryError>;

    /// 是否存在 parent -> child 的有效关系
    async fn has_active_relationship(
        &self,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> Result<bool, RepositoryError>;

    /// 创建或重新激活关系
    async fn upsert_relationship(
        &self,
        parent_id: Uuid,
        child_id: Uuid,
        relationship_type: RelationshipType,
    ) -> Result<UserRelationship, RepositoryError>;

    async fn set_relationship_status(
        &self,
        parent_id: Uuid,
        child_id: Uuid,
        status: RelationshipStatus,
    ) -> Result<UserRelationship, RepositoryError>;

    /// 父用户名下所有有效子用户 ID
    async fn managed_user_ids(&self, parent_id: Uuid) -> Result<Vec<Uuid>, RepositoryError>;
}
