// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::settings::Settings;
use crate::domain::repositories::billing_log_repository::BillingLogRepository;
use crate::domain::repositories::contact_repository::ContactRepository;
use crate::domain::repositories::price_plan_repository::PricePlanRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::repositories::wallet_repository::WalletRepository;
use crate::domain::services::access_service::AccessService;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::billing_service::BillingService;
use crate::domain::services::contact_service::ContactService;
use crate::domain::services::plan_service::PlanService;
use crate::domain::services::pricing_service::PricingService;
use crate::domain::services::user_service::UserService;
use crate::domain::services::wallet_service::WalletService;
use crate::domain::services::webhook_service::WhatsAppWebhookService;
use crate::infrastructure::repositories::billing_log_repo_impl::BillingLogRepositoryImpl;
use crate::infrastructure::repositories::contact_repo_impl::ContactRepositoryImpl;
use crate::infrastructure::repositories::price_plan_repo_impl::PricePlanRepositoryImpl;
use crate::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use crate::infrastructure::repositories::wallet_repo_impl::WalletRepositoryImpl;
use crate::infrastructure::security::jwt::TokenService;

/// 应用上下文
///
/// 持有所有服务的共享实例，由连接池与配置显式构造后注入路由
#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub access: Arc<AccessService>,
    pub pricing: Arc<PricingService>,
    pub plans: Arc<PlanService>,
    pub wallets: Arc<WalletService>,
    pub billing: Arc<BillingService>,
    pub contacts: Arc<ContactService>,
    pub webhooks: Arc<WhatsAppWebhookService>,
}

impl AppContext {
    pub fn new(db: Arc<DatabaseConnection>, settings: &Settings) -> Self {
        let currency = settings.billing.currency.clone();

        let user_repo: Arc<dyn UserRepository> = Arc::new(UserRepositoryImpl::new(db.clone()));
        let plan_repo: Arc<dyn PricePlanRepository> =
            Arc::new(PricePlanRepositoryImpl::new(db.clone()));
        let wallet_repo: Arc<dyn WalletRepository> =
            Arc::new(WalletRepositoryImpl::new(db.clone(), currency.clone()));
        let log_repo: Arc<dyn BillingLogRepository> =
            Arc::new(BillingLogRepositoryImpl::new(db.clone()));
        let contact_repo: Arc<dyn ContactRepository> = Arc::new(ContactRepositoryImpl::new(db));

        let tokens = TokenService::new(&settings.auth.jwt_secret, settings.auth.token_ttl_hours);
        let access = Arc::new(AccessService::new(user_repo.clone()));
        let pricing = Arc::new(PricingService::new(plan_repo.clone()));
        let billing = Arc::new(BillingService::new(
            log_repo,
            user_repo.clone(),
            pricing.clone(),
            access.clone(),
            currency.clone(),
        ));

        Self {
            auth: Arc::new(AuthService::new(user_repo.clone(), tokens)),
            users: Arc::new(UserService::new(user_repo.clone())),
            plans: Arc::new(PlanService::new(plan_repo, pricing.clone(), access.clone())),
            wallets: Arc::new(WalletService::new(wallet_repo, access.clone(), currency)),
            contacts: Arc::new(ContactService::new(contact_repo)),
            webhooks: Arc::new(WhatsAppWebhookService::new(
                user_repo,
                billing.clone(),
                settings.webhook.app_secret.clone(),
                settings.webhook.verify_token.clone(),
            )),
            access,
            pricing,
            billing,
        }
    }
}
