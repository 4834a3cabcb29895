// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::billing_log::Page;
use crate::domain::models::contact::{Contact, ContactPatch, ImportSummary, NewContact};
use crate::domain::models::user::Requester;
use crate::domain::repositories::contact_repository::ContactRepository;
use crate::utils::errors::DomainError;
use crate::utils::phone::normalize_phone_number;

/// 联系人服务，调用方只能操作自己的联系人
pub struct ContactService {
    contacts: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(contacts: Arc<dyn ContactRepository>) -> Self {
        Self { contacts }
    }

    pub async fn list(
        &self,
        requester: &Requester,
        search: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<Page<Contact>, DomainError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let (items, total) = self.contacts.list(requester.id, search, page, limit).await?;
        Ok(Page {
            items,
            total,
            page,
            limit,
        })
    }

    pub async fn create(
        &self,
        requester: &Requester,
        contact: NewContact,
    ) -> Result<Contact, DomainError> {
        let contact = normalize(contact)?;
        Ok(self.contacts.create(requester.id, contact).await?)
    }

    pub async fn update(
        &self,
        requester: &Requester,
        id: Uuid,
        mut patch: ContactPatch,
    ) -> Result<Contact, DomainError> {
        if let Some(phone) = patch.phone_number.take() {
            patch.phone_number = Some(normalized_phone(&phone)?);
        }
        Ok(self.contacts.update(requester.id, id, patch).await?)
    }

    pub async fn delete(&self, requester: &Requester, id: Uuid) -> Result<(), DomainError> {
        Ok(self.contacts.delete(requester.id, id).await?)
    }

    /// 批量导入；同一批次中重复号码以最后一条为准
    pub async fn import(
        &self,
        requester: &Requester,
        contacts: Vec<NewContact>,
    ) -> Result<ImportSummary, DomainError> {
        if contacts.is_empty() {
            return Err(DomainError::Validation("No contacts to import".to_string()));
        }

        let mut order = Vec::new();
        let mut latest: HashMap<String, NewContact> = HashMap::new();
        for contact in contacts {
            let contact = normalize(contact)?;
            if !latest.contains_key(&contact.phone_number) {
                order.push(contact.phone_number.clone());
            }
            latest.insert(contact.phone_number.clone(), contact);
        }
        let deduped = order
            .into_iter()
            .filter_map(|phone| latest.remove(&phone))
            .collect();

        let summary = self.contacts.bulk_upsert(requester.id, deduped).await?;
        tracing::info!(
            "Imported contacts for {}: {} inserted, {} updated",
            requester.id,
            summary.inserted,
            summary.updated
        );
        Ok(summary)
    }
}

fn normalized_phone(raw: &str) -> Result<String, DomainError> {
    let phone = normalize_phone_number(raw);
    if phone.len() < 6 || phone.len() > 15 {
        return Err(DomainError::Validation(format!(
            "Invalid phone number: {}",
            raw
        )));
    }
    Ok(phone)
}

fn normalize(contact: NewContact) -> Result<NewContact, DomainError> {
    Ok(NewContact {
        phone_number: normalized_phone(&contact.phone_number)?,
        ..contact
    })
}
