// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::support::{conflict_or, contains_pattern, now, page_index};
use crate::domain::models::contact::{Contact, ContactPatch, ImportSummary, NewContact};
use crate::domain::repositories::contact_repository::ContactRepository;
use crate::infrastructure::database::entities::contact;
use crate::utils::errors::RepositoryError;

const DUPLICATE_PHONE: &str = "A contact with this phone number already exists";

/// 联系人仓库实现
#[derive(Clone)]
pub struct ContactRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ContactRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<contact::Model> for Contact {
    fn from(model: contact::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            phone_number: model.phone_number,
            name: model.name,
            email: model.email,
            tags: model
                .tags
                .and_then(|v| serde_json::from_value(v).ok())
                .unwrap_or_default(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn tags_json(tags: Vec<String>) -> Option<serde_json::Value> {
    if tags.is_empty() {
        None
    } else {
        Some(serde_json::Value::from(tags))
    }
}

async fn find_owned<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    id: Uuid,
) -> Result<contact::Model, RepositoryError> {
    contact::Entity::find_by_id(id)
        .filter(contact::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or(RepositoryError::NotFound)
}

#[async_trait]
impl ContactRepository for ContactRepositoryImpl {
    async fn list(
        &self,
        user_id: Uuid,
        search: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<Contact>, u64), RepositoryError> {
        let mut query = contact::Entity::find().filter(contact::Column::UserId.eq(user_id));

        if let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = contains_pattern(term);
            query = query.filter(
                Condition::any()
                    .add(contact::Column::PhoneNumber.like(pattern.clone()))
                    .add(
                        Expr::expr(Func::lower(Expr::col(contact::Column::Name)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(contact::Column::Email)))
                            .like(pattern),
                    ),
            );
        }

        let paginator = query
            .order_by_desc(contact::Column::CreatedAt)
            .order_by_asc(contact::Column::Id)
            .paginate(self.db.as_ref(), limit);
        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(page_index(page))
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok((items, total))
    }

    async fn create(&self, user_id: Uuid, new: NewContact) -> Result<Contact, RepositoryError> {
        let timestamp = now();
        let inserted = contact::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            phone_number: Set(new.phone_number),
            name: Set(new.name),
            email: Set(new.email),
            tags: Set(tags_json(new.tags)),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| conflict_or(e, DUPLICATE_PHONE))?;
        Ok(inserted.into())
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: ContactPatch,
    ) -> Result<Contact, RepositoryError> {
        let mut active: contact::ActiveModel =
            find_owned(self.db.as_ref(), user_id, id).await?.into();
        if let Some(phone) = patch.phone_number {
            active.phone_number = Set(phone);
        }
        if let Some(name) = patch.name {
            active.name = Set(Some(name));
        }
        if let Some(email) = patch.email {
            active.email = Set(Some(email));
        }
        if let Some(tags) = patch.tags {
            active.tags = Set(tags_json(tags));
        }
        active.updated_at = Set(now());

        let updated = active
            .update(self.db.as_ref())
            .await
            .map_err(|e| conflict_or(e, DUPLICATE_PHONE))?;
        Ok(updated.into())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), RepositoryError> {
        let result = contact::Entity::delete_many()
            .filter(contact::Column::Id.eq(id))
            .filter(contact::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn bulk_upsert(
        &self,
        user_id: Uuid,
        contacts: Vec<NewContact>,
    ) -> Result<ImportSummary, RepositoryError> {
        if contacts.is_empty() {
            return Ok(ImportSummary::default());
        }

        let txn = self.db.begin().await?;
        let phones: Vec<String> = contacts.iter().map(|c| c.phone_number.clone()).collect();
        let mut existing: HashMap<String, contact::Model> = contact::Entity::find()
            .filter(contact::Column::UserId.eq(user_id))
            .filter(contact::Column::PhoneNumber.is_in(phones))
            .all(&txn)
            .await?
            .into_iter()
            .map(|m| (m.phone_number.clone(), m))
            .collect();

        let mut summary = ImportSummary::default();
        let timestamp = now();
        for incoming in contacts {
            match existing.remove(&incoming.phone_number) {
                Some(model) => {
                    let mut active: contact::ActiveModel = model.into();
                    if incoming.name.is_some() {
                        active.name = Set(incoming.name);
                    }
                    if incoming.email.is_some() {
                        active.email = Set(incoming.email);
                    }
                    if !incoming.tags.is_empty() {
                        active.tags = Set(tags_json(incoming.tags));
                    }
                    active.updated_at = Set(timestamp);
                    active.update(&txn).await?;
                    summary.updated += 1;
                }
                None => {
                    contact::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        user_id: Set(user_id),
                        phone_number: Set(incoming.phone_number),
                        name: Set(incoming.name),
                        email: Set(incoming.email),
                        tags: Set(tags_json(incoming.tags)),
                        created_at: Set(timestamp),
                        updated_at: Set(timestamp),
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| conflict_or(e, DUPLICATE_PHONE))?;
                    summary.inserted += 1;
                }
            }
        }

        txn.commit().await?;
        Ok(summary)
    }
}
