// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use wabill::application::context::AppContext;
use wabill::config::settings::{DatabaseSettings, Settings};
use wabill::domain::models::price_plan::{NewPricePlan, PlanRates, PricePlan};
use wabill::domain::models::user::{NewUser, Role, User};
use wabill::domain::repositories::price_plan_repository::PricePlanRepository;
use wabill::domain::repositories::user_repository::UserRepository;
use wabill::infrastructure::database::connection;
use wabill::infrastructure::repositories::price_plan_repo_impl::PricePlanRepositoryImpl;
use wabill::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use wabill::infrastructure::security::jwt::TokenService;
use wabill::infrastructure::security::password::hash_password;
use wabill::presentation::routes;

pub const APP_SECRET: &str = "test-app-secret";
pub const VERIFY_TOKEN: &str = "test-verify-token";
pub const PASSWORD: &str = "correct-horse-battery";

pub fn test_settings() -> Settings {
    Settings::with_overrides(&[
        ("database.url", "sqlite::memory:"),
        ("auth.jwt_secret", "integration-test-secret"),
        ("webhook.app_secret", APP_SECRET),
        ("webhook.verify_token", VERIFY_TOKEN),
        ("metrics.enabled", "false"),
    ])
    .expect("test settings")
}

/// 单连接的内存 SQLite，已执行全部迁移
pub async fn test_db() -> Arc<DatabaseConnection> {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
        min_connections: Some(1),
        connect_timeout: Some(30),
        idle_timeout: None,
    };
    let db = connection::create_pool(&settings)
        .await
        .expect("connect sqlite");
    connection::run_migrations(&db).await.expect("migrate");
    Arc::new(db)
}

/// 文件型 SQLite，多个连接可以真正并发地开启事务
pub async fn test_file_db(max_connections: u32) -> (Arc<DatabaseConnection>, PathBuf) {
    let path = std::env::temp_dir().join(format!("wabill-{}.db", Uuid::new_v4()));
    let settings = DatabaseSettings {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections: Some(max_connections),
        min_connections: Some(1),
        connect_timeout: Some(30),
        idle_timeout: None,
    };
    let db = connection::create_pool(&settings)
        .await
        .expect("connect sqlite file");
    connection::run_migrations(&db).await.expect("migrate");
    (Arc::new(db), path)
}

pub fn remove_file_db(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

pub fn rates(utility: i64, marketing: i64, authentication: i64, service: i64) -> PlanRates {
    PlanRates {
        utility_paise: utility,
        marketing_paise: marketing,
        authentication_paise: authentication,
        service_paise: service,
    }
}

pub async fn create_user(db: &Arc<DatabaseConnection>, role: Role) -> User {
    create_user_with_phone(db, role, None).await
}

pub async fn create_user_with_phone(
    db: &Arc<DatabaseConnection>,
    role: Role,
    phone_number_id: Option<&str>,
) -> User {
    let users = UserRepositoryImpl::new(db.clone());
    users
        .create(NewUser {
            name: format!("{} account", role),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: hash_password(PASSWORD).expect("hash"),
            role,
            is_approved: true,
            whatsapp_phone_number_id: phone_number_id.map(str::to_string),
        })
        .await
        .expect("create user")
}

pub async fn create_plan(
    db: &Arc<DatabaseConnection>,
    name: &str,
    plan_rates: PlanRates,
    is_default: bool,
) -> PricePlan {
    PricePlanRepositoryImpl::new(db.clone())
        .create(NewPricePlan {
            name: name.to_string(),
            rates: plan_rates,
            is_default,
            created_by: None,
        })
        .await
        .expect("create plan")
}

pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<DatabaseConnection>,
    pub ctx: AppContext,
    tokens: TokenService,
}

impl TestApp {
    pub fn bearer(&self, user: &User) -> String {
        format!("Bearer {}", self.tokens.issue(user).expect("issue token"))
    }
}

pub async fn create_test_app() -> TestApp {
    let settings = test_settings();
    let db = test_db().await;
    let ctx = AppContext::new(db.clone(), &settings);
    let server = TestServer::new(routes::build_router(ctx.clone())).expect("test server");
    TestApp {
        server,
        db,
        ctx,
        tokens: TokenService::new(&settings.auth.jwt_secret, settings.auth.token_ttl_hours),
    }
}
