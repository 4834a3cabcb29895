// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::models::user::{RelationshipStatus, RelationshipType};

#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    pub approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct ActiveRequest {
    pub active: bool,
}

/// 建立或重新激活父子关系
#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub parent_user_id: Uuid,
    pub child_user_id: Uuid,
    #[serde(default = "default_relationship_type")]
    pub relationship_type: RelationshipType,
}

fn default_relationship_type() -> RelationshipType {
    RelationshipType::Business
}

#[derive(Debug, Deserialize)]
pub struct RelationshipStatusRequest {
    pub parent_user_id: Uuid,
    pub child_user_id: Uuid,
    pub status: RelationshipStatus,
}
