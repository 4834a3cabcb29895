// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::user::{
    RelationshipStatus, RelationshipType, Requester, User, UserRelationship,
};
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::access_service::ensure_super_admin;
use crate::utils::errors::DomainError;

/// 租户管理服务，仅超级管理员可用
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn get(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User".to_string()))
    }

    pub async fn list(&self, requester: &Requester) -> Result<Vec<User>, DomainError> {
        ensure_super_admin(requester)?;
        Ok(self.users.list().await?)
    }

    pub async fn set_approval(
        &self,
        requester: &Requester,
        id: Uuid,
        approved: bool,
    ) -> Result<User, DomainError> {
        ensure_super_admin(requester)?;
        let user = self.users.set_approval(id, approved).await?;
        tracing::info!("User {} approval set to {}", id, approved);
        Ok(user)
    }

    pub async fn set_active(
        &self,
        requester: &Requester,
        id: Uuid,
        active: bool,
    ) -> Result<User, DomainError> {
        ensure_super_admin(requester)?;
        if requester.id == id && !active {
            return Err(DomainError::Validation(
                "You cannot deactivate your own account".to_string(),
            ));
        }
        let user = self.users.set_active(id, active).await?;
        tracing::info!("User {} active set to {}", id, active);
        Ok(user)
    }

    pub async fn link(
        &self,
        requester: &Requester,
        parent_id: Uuid,
        child_id: Uuid,
        relationship_type: RelationshipType,
    ) -> Result<UserRelationship, DomainError> {
        ensure_super_admin(requester)?;
        if parent_id == child_id {
            return Err(DomainError::Validation(
                "A user cannot manage themselves".to_string(),
            ));
        }
        self.get(parent_id).await?;
        self.get(child_id).await?;
        Ok(self
            .users
            .upsert_relationship(parent_id, child_id, relationship_type)
            .await?)
    }

    pub async fn set_relationship_status(
        &self,
        requester: &Requester,
        parent_id: Uuid,
        child_id: Uuid,
        status: RelationshipStatus,
    ) -> Result<UserRelationship, DomainError> {
        ensure_super_admin(requester)?;
        Ok(self
            .users
            .set_relationship_status(parent_id, child_id, status)
            .await?)
    }
}
