// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 用户角色
///
/// 决定调用方的权限范围：普通用户只能访问自己的数据，
/// 聚合商可访问其名下子用户，超级管理员可访问全部租户。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Aggregator,
    SuperAdmin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Aggregator => write!(f, "aggregator"),
            Role::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "aggregator" => Ok(Role::Aggregator),
            "super_admin" => Ok(Role::SuperAdmin),
            _ => Err(()),
        }
    }
}

/// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub is_approved: bool,
    pub is_active: bool,
    /// WhatsApp Business 号码 ID，用于把 webhook 事件归属到用户
    pub whatsapp_phone_number_id: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl User {
    /// 未审批或已停用的用户不能登录
    pub fn can_authenticate(&self) -> bool {
        self.is_approved && self.is_active
    }

    pub fn as_requester(&self) -> Requester {
        Requester {
            id: self.id,
            role: self.role,
        }
    }
}

/// 新用户
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_approved: bool,
    pub whatsapp_phone_number_id: Option<String>,
}

/// 已认证的调用方
///
/// 由认证中间件注入到请求扩展中
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: Uuid,
    pub role: Role,
}

impl Requester {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    pub fn is_aggregator(&self) -> bool {
        self.role == Role::Aggregator
    }
}

/// 租户关系类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Business,
    Aggregator,
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RelationshipType::Business => write!(f, "business"),
            RelationshipType::Aggregator => write!(f, "aggregator"),
        }
    }
}

impl FromStr for RelationshipType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" => Ok(RelationshipType::Business),
            "aggregator" => Ok(RelationshipType::Aggregator),
            _ => Err(()),
        }
    }
}

/// 租户关系状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RelationshipStatus::Active => write!(f, "active"),
            RelationshipStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for RelationshipStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(RelationshipStatus::Active),
            "inactive" => Ok(RelationshipStatus::Inactive),
            _ => Err(()),
        }
    }
}

/// 父子租户关系
///
/// 仅用于授权查询，父用户并不拥有子用户的数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRelationship {
    pub id: Uuid,
    pub parent_user_id: Uuid,
    pub child_user_id: Uuid,
    pub relationship_type: RelationshipType,
    pub status: RelationshipStatus,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}
