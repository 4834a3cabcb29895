// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use crate::domain::models::user::{NewUser, Role, User};
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::security::jwt::TokenService;
use crate::infrastructure::security::password::{hash_password, verify_password};
use crate::utils::errors::DomainError;

/// 注册命令
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub whatsapp_phone_number_id: Option<String>,
}

/// 登录结果
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

/// 认证服务
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// 注册新用户，等待管理员审批
    pub async fn register(&self, registration: Registration) -> Result<User, DomainError> {
        let email = registration.email.trim().to_ascii_lowercase();
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict(
                "Email is already registered".to_string(),
            ));
        }

        let password_hash = hash_password(&registration.password)?;
        let user = self
            .users
            .create(NewUser {
                name: registration.name.trim().to_string(),
                email,
                password_hash,
                role: Role::User,
                is_approved: false,
                whatsapp_phone_number_id: registration
                    .whatsapp_phone_number_id
                    .filter(|id| !id.trim().is_empty()),
            })
            .await?;

        tracing::info!("Registered user {} pending approval", user.id);
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let email = email.trim().to_ascii_lowercase();
        let invalid = || DomainError::Authentication("Invalid email or password".to_string());

        let user = self.users.find_by_email(&email).await?.ok_or_else(invalid)?;
        if !verify_password(password, &user.password_hash) {
            tracing::debug!("Failed login for user {}", user.id);
            return Err(invalid());
        }
        ensure_can_authenticate(&user)?;

        let token = self.tokens.issue(&user)?;
        Ok(Session {
            token,
            expires_in: self.tokens.ttl_seconds(),
            user,
        })
    }

    /// 校验 bearer 令牌并重新加载用户
    pub async fn authenticate(&self, token: &str) -> Result<User, DomainError> {
        let claims = self.tokens.verify(token)?;
        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| DomainError::Authentication("Unknown user".to_string()))?;
        ensure_can_authenticate(&user)?;
        Ok(user)
    }
}

fn ensure_can_authenticate(user: &User) -> Result<(), DomainError> {
    if !user.is_active {
        return Err(DomainError::Authentication(
            "Account is deactivated".to_string(),
        ));
    }
    if !user.is_approved {
        return Err(DomainError::Authentication(
            "Account is pending approval".to_string(),
        ));
    }
    Ok(())
}
