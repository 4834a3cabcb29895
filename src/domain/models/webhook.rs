// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::price_plan::MessageCategory;

/// WhatsApp Cloud API webhook 推送体
///
/// 只建模计费需要的字段，其余字段被忽略
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WhatsAppNotification {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<WhatsAppEntry>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WhatsAppEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub changes: Vec<WhatsAppChange>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WhatsAppChange {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub value: WhatsAppChangeValue,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WhatsAppChangeValue {
    pub metadata: Option<WhatsAppMetadata>,
    #[serde(default)]
    pub statuses: Vec<WhatsAppStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppMetadata {
    #[serde(default)]
    pub display_phone_number: String,
    pub phone_number_id: String,
}

/// 消息状态回调
#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppStatus {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    /// Unix 秒，字符串形式
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub recipient_id: String,
    pub conversation: Option<WhatsAppConversation>,
    pub pricing: Option<WhatsAppPricing>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConversation {
    pub id: String,
    pub expiration_timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppPricing {
    #[serde(default)]
    pub billable: bool,
    #[serde(default)]
    pub category: String,
}

impl WhatsAppStatus {
    /// 带会话 ID 且 `pricing.billable` 为真的状态才计费
    pub fn is_billable(&self) -> bool {
        self.conversation.is_some() && self.pricing.as_ref().is_some_and(|p| p.billable)
    }

    pub fn category(&self) -> Option<MessageCategory> {
        self.pricing.as_ref()?.category.parse().ok()
    }

    pub fn sent_at(&self) -> DateTime<FixedOffset> {
        parse_unix_seconds(&self.timestamp).unwrap_or_else(|| Utc::now().fixed_offset())
    }

    pub fn expires_at(&self) -> Option<DateTime<FixedOffset>> {
        self.conversation
            .as_ref()
            .and_then(|c| c.expiration_timestamp.as_deref())
            .and_then(parse_unix_seconds)
    }
}

fn parse_unix_seconds(value: &str) -> Option<DateTime<FixedOffset>> {
    let secs: i64 = value.trim().parse().ok()?;
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.fixed_offset())
}

/// 单条状态事件的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestOutcome {
    Recorded,
    Duplicate,
    Skipped,
}

impl IngestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestOutcome::Recorded => "recorded",
            IngestOutcome::Duplicate => "duplicate",
            IngestOutcome::Skipped => "skipped",
        }
    }
}

/// webhook 批次处理报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub recorded: u32,
    pub duplicate: u32,
    pub skipped: u32,
}

impl IngestReport {
    pub fn add(&mut self, outcome: IngestOutcome) {
        match outcome {
            IngestOutcome::Recorded => self.recorded += 1,
            IngestOutcome::Duplicate => self.duplicate += 1,
            IngestOutcome::Skipped => self.skipped += 1,
        }
    }
}
