// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use serde_json::{json, Value};

use wabill::domain::models::user::Role;

use super::helpers::{create_plan, create_test_app, create_user, rates, PASSWORD};

#[tokio::test]
async fn test_health_is_public() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = create_test_app().await;

    let response = app.server.get("/wallet").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["success"], false);

    let response = app
        .server
        .get("/wallet")
        .add_header("Authorization", "Bearer not-a-token")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registration_requires_approval_before_login() {
    let app = create_test_app().await;
    let admin = create_user(&app.db, Role::SuperAdmin).await;

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "name": "Meera Traders",
            "email": "Owner@Meera.example",
            "password": "s3cure-password",
            "whatsapp_phone_number_id": "PNID-MEERA"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body = response.json::<Value>();
    let user_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["email"], "owner@meera.example");
    assert_eq!(body["data"]["is_approved"], false);
    assert!(body["data"].get("password_hash").is_none());

    let login = json!({ "email": "owner@meera.example", "password": "s3cure-password" });
    let response = app.server.post("/auth/login").json(&login).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post(&format!("/admin/users/{}/approval", user_id))
        .add_header("Authorization", app.bearer(&admin))
        .json(&json!({ "approved": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app.server.post("/auth/login").json(&login).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let token = response.json::<Value>()["data"]["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .server
        .get("/auth/me")
        .add_header("Authorization", format!("Bearer {}", token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["data"]["id"], user_id.as_str());
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let app = create_test_app().await;
    let user = create_user(&app.db, Role::User).await;

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": user.email, "password": "not-the-password" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "email": user.email, "password": PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_unrelated_user_cannot_read_another_plan() {
    let app = create_test_app().await;
    create_plan(&app.db, "Default", rates(115, 780, 115, 35), true).await;
    let alice = create_user(&app.db, Role::User).await;
    let bob = create_user(&app.db, Role::User).await;

    let response = app
        .server
        .get(&format!("/users/{}/plan", bob.id))
        .add_header("Authorization", app.bearer(&alice))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app
        .server
        .get(&format!("/users/{}/plan", alice.id))
        .add_header("Authorization", app.bearer(&alice))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["data"]["name"], "Default");
}

#[tokio::test]
async fn test_aggregator_cannot_price_below_floor() {
    let app = create_test_app().await;
    create_plan(&app.db, "Default", rates(115, 780, 115, 35), true).await;
    let aggregator = create_user(&app.db, Role::Aggregator).await;

    let response = app
        .server
        .post("/plans")
        .add_header("Authorization", app.bearer(&aggregator))
        .json(&json!({
            "name": "Discount",
            "utility": 1.15,
            "marketing": "7.00",
            "authentication": 115,
            "service": 35
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["details"]["category"], "marketing");
    assert_eq!(body["details"]["floor_paise"], 780);
    assert_eq!(body["details"]["requested_paise"], 700);

    let response = app
        .server
        .post("/plans")
        .add_header("Authorization", app.bearer(&aggregator))
        .json(&json!({
            "name": "Resale",
            "utility": 1.20,
            "marketing": 8,
            "authentication": 120,
            "service": 40
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["data"]["marketing_paise"], 800);
}

#[tokio::test]
async fn test_plain_user_cannot_manage_plans() {
    let app = create_test_app().await;
    let plan = create_plan(&app.db, "Default", rates(115, 780, 115, 35), true).await;
    let user = create_user(&app.db, Role::User).await;

    let response = app
        .server
        .get("/plans")
        .add_header("Authorization", app.bearer(&user))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app
        .server
        .post(&format!("/users/{}/plan", user.id))
        .add_header("Authorization", app.bearer(&user))
        .json(&json!({ "plan_id": plan.id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_wallet_posting_is_idempotent_over_http() {
    let app = create_test_app().await;
    let admin = create_user(&app.db, Role::SuperAdmin).await;
    let user = create_user(&app.db, Role::User).await;
    let path = format!("/users/{}/wallet/transactions", user.id);
    let recharge = json!({
        "transaction_id": "razorpay-pay-001",
        "transaction_type": "RECHARGE",
        "amount_paise": 50_000
    });

    let response = app
        .server
        .post(&path)
        .add_header("Authorization", app.bearer(&admin))
        .json(&recharge)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = app
        .server
        .post(&path)
        .add_header("Authorization", app.bearer(&admin))
        .json(&recharge)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app
        .server
        .post(&path)
        .add_header("Authorization", app.bearer(&admin))
        .json(&json!({
            "transaction_id": "manual-debit-1",
            "transaction_type": "DEBIT",
            "amount_paise": 60_000
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["details"]["available_paise"], 50_000);

    let response = app
        .server
        .get("/wallet")
        .add_header("Authorization", app.bearer(&user))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["data"]["balance_paise"], 50_000);

    let response = app
        .server
        .post(&path)
        .add_header("Authorization", app.bearer(&user))
        .json(&json!({
            "transaction_id": "self-service",
            "transaction_type": "RECHARGE",
            "amount_paise": 100
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_system_wallets_are_admin_only() {
    let app = create_test_app().await;
    let admin = create_user(&app.db, Role::SuperAdmin).await;
    let aggregator = create_user(&app.db, Role::Aggregator).await;

    let response = app
        .server
        .get("/system-wallets")
        .add_header("Authorization", app.bearer(&aggregator))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app
        .server
        .post("/system-wallets/main/adjust")
        .add_header("Authorization", app.bearer(&admin))
        .json(&json!({ "delta_paise": 2_500 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["data"]["balance_paise"], 2_500);

    let response = app
        .server
        .post("/system-wallets/petty/adjust")
        .add_header("Authorization", app.bearer(&admin))
        .json(&json!({ "delta_paise": 1 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logs_record_and_export() {
    let app = create_test_app().await;
    create_plan(&app.db, "Default", rates(115, 780, 115, 35), true).await;
    let admin = create_user(&app.db, Role::SuperAdmin).await;
    let user = create_user(&app.db, Role::User).await;

    let charge = json!({
        "user_id": user.id,
        "conversation_id": "CONV-HTTP-1",
        "category": "utility",
        "recipient_number": "919812345678",
        "start_time": "2025-02-01T09:00:00Z"
    });
    let response = app
        .server
        .post("/logs")
        .add_header("Authorization", app.bearer(&admin))
        .json(&charge)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = app
        .server
        .post("/logs")
        .add_header("Authorization", app.bearer(&admin))
        .json(&charge)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app
        .server
        .get("/logs")
        .add_query_param("category", "utility")
        .add_header("Authorization", app.bearer(&user))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["summary"][0]["total_paise"], 115);

    let response = app
        .server
        .get("/logs/export")
        .add_header("Authorization", app.bearer(&user))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "text/csv; charset=utf-8"
    );
    let csv = response.text();
    assert!(csv.starts_with("conversation_id,category,recipient_number"));
    assert!(csv.contains("CONV-HTTP-1,utility,919812345678"));

    let response = app
        .server
        .get("/logs/all")
        .add_header("Authorization", app.bearer(&user))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_contacts_crud_and_import() {
    let app = create_test_app().await;
    let user = create_user(&app.db, Role::User).await;
    let other = create_user(&app.db, Role::User).await;

    let response = app
        .server
        .post("/contacts")
        .add_header("Authorization", app.bearer(&user))
        .json(&json!({ "phone_number": "+91 98123 45678", "name": "Ravi", "tags": ["vip"] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let contact_id = response.json::<Value>()["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .server
        .post("/contacts")
        .add_header("Authorization", app.bearer(&user))
        .json(&json!({ "phone_number": "919812345678" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = app
        .server
        .post("/contacts/import")
        .add_header("Authorization", app.bearer(&user))
        .json(&json!({ "contacts": [
            { "phone_number": "919812345678", "name": "Ravi Kumar" },
            { "phone_number": "971501234567", "name": "Omar" }
        ]}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["inserted"], 1);
    assert_eq!(body["data"]["updated"], 1);

    let response = app
        .server
        .get("/contacts")
        .add_query_param("search", "ravi")
        .add_header("Authorization", app.bearer(&user))
        .await;
    let body = response.json::<Value>();
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "Ravi Kumar");

    let response = app
        .server
        .get("/contacts")
        .add_query_param("search", "_")
        .add_header("Authorization", app.bearer(&user))
        .await;
    assert_eq!(response.json::<Value>()["data"]["total"], 0);

    let response = app
        .server
        .delete(&format!("/contacts/{}", contact_id))
        .add_header("Authorization", app.bearer(&other))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .server
        .delete(&format!("/contacts/{}", contact_id))
        .add_header("Authorization", app.bearer(&user))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_malformed_requests_get_json_envelope() {
    let app = create_test_app().await;
    let admin = create_user(&app.db, Role::SuperAdmin).await;

    let response = app
        .server
        .post("/plans")
        .add_header("Authorization", app.bearer(&admin))
        .json(&json!({
            "name": "Missing utility",
            "marketing": 8,
            "authentication": 1.2,
            "service": 0.4
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("utility"));

    let response = app
        .server
        .get("/logs")
        .add_query_param("category", "bogus")
        .add_header("Authorization", app.bearer(&admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);

    let response = app
        .server
        .get("/users/not-a-uuid/plan")
        .add_header("Authorization", app.bearer(&admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["success"], false);
}
