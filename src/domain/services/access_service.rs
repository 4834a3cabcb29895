// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::billing_log::LogScope;
use crate::domain::models::user::{Requester, Role};
use crate::domain::repositories::user_repository::UserRepository;
use crate::utils::errors::DomainError;

/// 授权服务
///
/// 判断调用方能否访问目标用户的计费与方案数据：
/// 超级管理员总是可以；访问自己总是可以；
/// 聚合商仅当存在 parent=调用方, child=目标 的有效关系时可以；其余拒绝。
pub struct AccessService {
    users: Arc<dyn UserRepository>,
}

impl AccessService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn can_access_user_billing(
        &self,
        requester: &Requester,
        target_user_id: Uuid,
    ) -> Result<bool, DomainError> {
        if requester.is_super_admin() || requester.id == target_user_id {
            return Ok(true);
        }

        if requester.is_aggregator() {
            return Ok(self
                .users
                .has_active_relationship(requester.id, target_user_id)
                .await?);
        }

        Ok(false)
    }

    pub async fn ensure_can_access(
        &self,
        requester: &Requester,
        target_user_id: Uuid,
    ) -> Result<(), DomainError> {
        if self.can_access_user_billing(requester, target_user_id).await? {
            Ok(())
        } else {
            tracing::debug!(
                "Requester {} ({}) denied access to user {}",
                requester.id,
                requester.role,
                target_user_id
            );
            Err(DomainError::Authorization(
                "You do not have access to this user".to_string(),
            ))
        }
    }

    /// 受管用户范围：超级管理员为全部租户，聚合商为其有效子用户
    pub async fn managed_scope(&self, requester: &Requester) -> Result<LogScope, DomainError> {
        match requester.role {
            Role::SuperAdmin => Ok(LogScope::All),
            Role::Aggregator => Ok(LogScope::Users(
                self.users.managed_user_ids(requester.id).await?,
            )),
            Role::User => Err(DomainError::Authorization(
                "Only aggregators can view managed users".to_string(),
            )),
        }
    }
}

pub fn ensure_super_admin(requester: &Requester) -> Result<(), DomainError> {
    if requester.is_super_admin() {
        Ok(())
    } else {
        Err(DomainError::Authorization(
            "Super admin role required".to_string(),
        ))
    }
}
