// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::Extension,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::application::context::AppContext;
use crate::presentation::handlers::{
    admin_handler, auth_handler, billing_handler, contact_handler, health_handler, plan_handler,
    wallet_handler, webhook_handler,
};
use crate::presentation::middleware::auth_middleware::auth_middleware;

/// 创建应用路由
///
/// 健康检查、注册登录与 WhatsApp webhook 为公开路由，其余路由需要 Bearer 令牌
pub fn build_router(ctx: AppContext) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_handler::health_check))
        .route("/version", get(health_handler::version))
        .route("/auth/register", post(auth_handler::register))
        .route("/auth/login", post(auth_handler::login))
        .route(
            "/webhooks/whatsapp",
            get(webhook_handler::verify).post(webhook_handler::receive),
        );

    let protected_routes = Router::new()
        .route("/auth/me", get(auth_handler::me))
        // tenant administration
        .route("/admin/users", get(admin_handler::list_users))
        .route(
            "/admin/users/{id}/approval",
            post(admin_handler::set_approval),
        )
        .route("/admin/users/{id}/active", post(admin_handler::set_active))
        .route(
            "/admin/relationships",
            post(admin_handler::link).put(admin_handler::set_relationship_status),
        )
        // price plans
        .route(
            "/plans",
            get(plan_handler::list_plans).post(plan_handler::create_plan),
        )
        .route("/plans/{id}", put(plan_handler::update_plan))
        .route("/plans/{id}/default", post(plan_handler::set_default_plan))
        .route(
            "/plans/{id}/overrides",
            get(plan_handler::list_overrides).put(plan_handler::upsert_override),
        )
        .route(
            "/users/{id}/plan",
            get(plan_handler::get_user_plan).post(plan_handler::assign_plan),
        )
        // wallets
        .route("/wallet", get(wallet_handler::my_wallet))
        .route("/wallet/transactions", get(wallet_handler::my_transactions))
        .route("/users/{id}/wallet", get(wallet_handler::user_wallet))
        .route(
            "/users/{id}/wallet/transactions",
            get(wallet_handler::user_transactions).post(wallet_handler::post_transaction),
        )
        .route("/system-wallets", get(wallet_handler::system_wallets))
        .route(
            "/system-wallets/{wallet_type}/adjust",
            post(wallet_handler::adjust_system_wallet),
        )
        // billing logs
        .route(
            "/logs",
            get(billing_handler::list_own).post(billing_handler::record_charge),
        )
        .route("/logs/export", get(billing_handler::export_own))
        .route("/logs/all", get(billing_handler::list_all))
        .route("/logs/all/export", get(billing_handler::export_all))
        .route("/logs/{id}/status", post(billing_handler::update_status))
        .route("/managed/logs", get(billing_handler::list_managed))
        .route("/managed/logs/export", get(billing_handler::export_managed))
        // contacts
        .route(
            "/contacts",
            get(contact_handler::list_contacts).post(contact_handler::create_contact),
        )
        .route("/contacts/import", post(contact_handler::import_contacts))
        .route(
            "/contacts/{id}",
            put(contact_handler::update_contact).delete(contact_handler::delete_contact),
        )
        .layer(middleware::from_fn_with_state(
            ctx.auth.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(Extension(ctx))
        .layer(TraceLayer::new_for_http())
}
