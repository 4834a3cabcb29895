// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use std::sync::Arc;

use crate::domain::models::user::User;
use crate::domain::models::webhook::{
    IngestOutcome, IngestReport, WhatsAppNotification, WhatsAppStatus,
};
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::billing_service::{BillingService, RecordCharge};
use crate::infrastructure::security::signature::verify_signature;
use crate::utils::errors::DomainError;

/// WhatsApp webhook 服务
///
/// 校验订阅握手与推送签名，并把可计费的状态回调转换为会话计费
pub struct WhatsAppWebhookService {
    users: Arc<dyn UserRepository>,
    billing: Arc<BillingService>,
    app_secret: String,
    verify_token: String,
}

impl WhatsAppWebhookService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        billing: Arc<BillingService>,
        app_secret: impl Into<String>,
        verify_token: impl Into<String>,
    ) -> Self {
        Self {
            users,
            billing,
            app_secret: app_secret.into(),
            verify_token: verify_token.into(),
        }
    }

    /// 订阅握手，成功时返回需要回显的 challenge
    pub fn verify_subscription(
        &self,
        mode: Option<&str>,
        token: Option<&str>,
        challenge: Option<&str>,
    ) -> Result<String, DomainError> {
        match (mode, token, challenge) {
            (Some("subscribe"), Some(token), Some(challenge)) if token == self.verify_token => {
                Ok(challenge.to_string())
            }
            _ => Err(DomainError::Authorization(
                "Webhook verification failed".to_string(),
            )),
        }
    }

    pub fn verify_payload(&self, body: &[u8], signature: Option<&str>) -> Result<(), DomainError> {
        let signature = signature.ok_or_else(|| {
            DomainError::Authentication("Missing X-Hub-Signature-256 header".to_string())
        })?;
        if verify_signature(&self.app_secret, body, signature) {
            Ok(())
        } else {
            tracing::warn!("Rejected webhook payload with invalid signature");
            Err(DomainError::Authentication(
                "Invalid webhook signature".to_string(),
            ))
        }
    }

    /// 处理一批推送。数据库错误向上传播，让上游重试整批
    pub async fn ingest(
        &self,
        notification: WhatsAppNotification,
    ) -> Result<IngestReport, DomainError> {
        let mut report = IngestReport::default();

        for entry in notification.entry {
            for change in entry.changes {
                let value = change.value;
                let owner = match value.metadata.as_ref() {
                    Some(metadata) => {
                        self.users
                            .find_by_phone_number_id(&metadata.phone_number_id)
                            .await?
                    }
                    None => None,
                };

                for status in value.statuses {
                    let outcome = match owner.as_ref() {
                        Some(user) => self.ingest_status(user, &status).await?,
                        None => {
                            tracing::debug!(
                                "Skipping status {} with no matching phone number owner",
                                status.id
                            );
                            IngestOutcome::Skipped
                        }
                    };
                    counter!("webhook_events_total", "outcome" => outcome.as_str())
                        .increment(1);
                    report.add(outcome);
                }
            }
        }

        tracing::info!(
            "Webhook batch processed: {} recorded, {} duplicate, {} skipped",
            report.recorded,
            report.duplicate,
            report.skipped
        );
        Ok(report)
    }

    async fn ingest_status(
        &self,
        owner: &User,
        status: &WhatsAppStatus,
    ) -> Result<IngestOutcome, DomainError> {
        if !status.is_billable() {
            return Ok(IngestOutcome::Skipped);
        }
        let (Some(conversation), Some(category)) = (status.conversation.as_ref(), status.category())
        else {
            return Ok(IngestOutcome::Skipped);
        };

        let command = RecordCharge {
            user_id: owner.id,
            conversation_id: conversation.id.clone(),
            category,
            recipient_number: status.recipient_id.clone(),
            country_code: None,
            start_time: status.sent_at(),
            end_time: status.expires_at(),
            amount_paise: None,
            debit_wallet: true,
        };

        match self.billing.record_charge(command).await {
            Ok(outcome) if outcome.created => Ok(IngestOutcome::Recorded),
            Ok(_) => Ok(IngestOutcome::Duplicate),
            Err(DomainError::Database(e)) => Err(DomainError::Database(e)),
            Err(e) => {
                tracing::warn!(
                    "Skipping conversation {} for user {}: {}",
                    conversation.id,
                    owner.id,
                    e
                );
                Ok(IngestOutcome::Skipped)
            }
        }
    }
}

#[cfg(test)]
#[path = "webhook_service_test.rs"]
mod tests;
