// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use super::support::{conflict_or, now, parse_column};
use crate::domain::models::user::{
    NewUser, RelationshipStatus, RelationshipType, User, UserRelationship,
};
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::database::entities::{user, user_relationship};
use crate::utils::errors::RepositoryError;

/// 用户与租户关系仓库实现
#[derive(Clone)]
pub struct UserRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> Result<user::Model, RepositoryError> {
        user::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_relationship(
        &self,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> Result<Option<user_relationship::Model>, RepositoryError> {
        Ok(user_relationship::Entity::find()
            .filter(user_relationship::Column::ParentUserId.eq(parent_id))
            .filter(user_relationship::Column::ChildUserId.eq(child_id))
            .one(self.db.as_ref())
            .await?)
    }
}

impl TryFrom<user::Model> for User {
    type Error = RepositoryError;

    fn try_from(model: user::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            role: parse_column("role", &model.role)?,
            is_approved: model.is_approved,
            is_active: model.is_active,
            whatsapp_phone_number_id: model.whatsapp_phone_number_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<user_relationship::Model> for UserRelationship {
    type Error = RepositoryError;

    fn try_from(model: user_relationship::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            parent_user_id: model.parent_user_id,
            child_user_id: model.child_user_id,
            relationship_type: parse_column("relationship_type", &model.relationship_type)?,
            status: parse_column("status", &model.status)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        user::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_phone_number_id(
        &self,
        phone_number_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        user::Entity::find()
            .filter(user::Column::WhatsappPhoneNumberId.eq(phone_number_id))
            .one(self.db.as_ref())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let timestamp = now();
        user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.to_string()),
            is_approved: Set(new_user.is_approved),
            is_active: Set(true),
            whatsapp_phone_number_id: Set(new_user.whatsapp_phone_number_id),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| conflict_or(e, "Email or WhatsApp number is already registered"))?
        .try_into()
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn set_approval(&self, id: Uuid, approved: bool) -> Result<User, RepositoryError> {
        let mut active: user::ActiveModel = self.find_model(id).await?.into();
        active.is_approved = Set(approved);
        active.updated_at = Set(now());
        active.update(self.db.as_ref()).await?.try_into()
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<User, RepositoryError> {
        let mut active: user::ActiveModel = self.find_model(id).await?.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(now());
        active.update(self.db.as_ref()).await?.try_into()
    }

    async fn has_active_relationship(
        &self,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .find_relationship(parent_id, child_id)
            .await?
            .is_some_and(|r| r.status == RelationshipStatus::Active.to_string()))
    }

    async fn upsert_relationship(
        &self,
        parent_id: Uuid,
        child_id: Uuid,
        relationship_type: RelationshipType,
    ) -> Result<UserRelationship, RepositoryError> {
        let timestamp = now();
        let saved = match self.find_relationship(parent_id, child_id).await? {
            Some(existing) => {
                let mut active: user_relationship::ActiveModel = existing.into();
                active.relationship_type = Set(relationship_type.to_string());
                active.status = Set(RelationshipStatus::Active.to_string());
                active.updated_at = Set(timestamp);
                active.update(self.db.as_ref()).await?
            }
            None => user_relationship::ActiveModel {
                id: Set(Uuid::new_v4()),
                parent_user_id: Set(parent_id),
                child_user_id: Set(child_id),
                relationship_type: Set(relationship_type.to_string()),
                status: Set(RelationshipStatus::Active.to_string()),
                created_at: Set(timestamp),
                updated_at: Set(timestamp),
            }
            .insert(self.db.as_ref())
            .await
            .map_err(|e| conflict_or(e, "Relationship already exists"))?,
        };
        saved.try_into()
    }

    async fn set_relationship_status(
        &self,
        parent_id: Uuid,
        child_id: Uuid,
        status: RelationshipStatus,
    ) -> Result<UserRelationship, RepositoryError> {
        let existing = self
            .find_relationship(parent_id, child_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let mut active: user_relationship::ActiveModel = existing.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(now());
        active.update(self.db.as_ref()).await?.try_into()
    }

    async fn managed_user_ids(&self, parent_id: Uuid) -> Result<Vec<Uuid>, RepositoryError> {
        Ok(user_relationship::Entity::find()
            .select_only()
            .column(user_relationship::Column::ChildUserId)
            .filter(user_relationship::Column::ParentUserId.eq(parent_id))
            .filter(user_relationship::Column::Status.eq(RelationshipStatus::Active.to_string()))
            .into_tuple::<Uuid>()
            .all(self.db.as_ref())
            .await?)
    }
}
