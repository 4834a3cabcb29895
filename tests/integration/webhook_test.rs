// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::{json, Value};

use wabill::domain::models::billing_log::BillingStatus;
use wabill::domain::models::user::Role;
use wabill::domain::models::wallet::{PostTransaction, TransactionType};
use wabill::infrastructure::security::signature::sign_payload;

use super::helpers::{
    create_plan, create_test_app, create_user_with_phone, rates, APP_SECRET, VERIFY_TOKEN,
};

fn status_payload(phone_number_id: &str, conversation_id: &str, billable: bool) -> Vec<u8> {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "WABA-1",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": {
                        "display_phone_number": "15550001111",
                        "phone_number_id": phone_number_id
                    },
                    "statuses": [{
                        "id": "wamid.A",
                        "status": "sent",
                        "timestamp": "1736500000",
                        "recipient_id": "919812345678",
                        "conversation": {
                            "id": conversation_id,
                            "expiration_timestamp": "1736586400"
                        },
                        "pricing": {
                            "billable": billable,
                            "pricing_model": "CBP",
                            "category": "marketing"
                        }
                    }]
                }
            }]
        }]
    })
    .to_string()
    .into_bytes()
}

#[tokio::test]
async fn test_subscription_handshake() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/webhooks/whatsapp")
        .add_query_param("hub.mode", "subscribe")
        .add_query_param("hub.verify_token", VERIFY_TOKEN)
        .add_query_param("hub.challenge", "1158201444")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "1158201444");

    let response = app
        .server
        .get("/webhooks/whatsapp")
        .add_query_param("hub.mode", "subscribe")
        .add_query_param("hub.verify_token", "wrong")
        .add_query_param("hub.challenge", "1158201444")
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unsigned_or_tampered_payload_is_rejected() {
    let app = create_test_app().await;
    let body = status_payload("PNID-1", "CONV-1", true);

    let response = app
        .server
        .post("/webhooks/whatsapp")
        .content_type("application/json")
        .bytes(Bytes::from(body.clone()))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/webhooks/whatsapp")
        .content_type("application/json")
        .add_header("X-Hub-Signature-256", sign_payload("other-secret", &body))
        .bytes(Bytes::from(body))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_billable_status_is_charged_once() {
    let app = create_test_app().await;
    create_plan(&app.db, "Default", rates(115, 780, 115, 35), true).await;
    let owner = create_user_with_phone(&app.db, Role::User, Some("PNID-OWNER")).await;
    app.ctx
        .wallets
        .post_unchecked(PostTransaction {
            transaction_id: "seed".to_string(),
            user_id: owner.id,
            transaction_type: TransactionType::Recharge,
            amount_paise: 1_000,
            description: None,
            reference_id: None,
        })
        .await
        .unwrap();

    let body = status_payload("PNID-OWNER", "CONV-WA-1", true);
    let signature = sign_payload(APP_SECRET, &body);

    let response = app
        .server
        .post("/webhooks/whatsapp")
        .content_type("application/json")
        .add_header("X-Hub-Signature-256", signature.clone())
        .bytes(Bytes::from(body.clone()))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["data"]["recorded"], 1);

    let response = app
        .server
        .post("/webhooks/whatsapp")
        .content_type("application/json")
        .add_header("X-Hub-Signature-256", signature)
        .bytes(Bytes::from(body))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["data"]["duplicate"], 1);

    let log = app
        .ctx
        .billing
        .list(
            &owner.as_requester(),
            wabill::domain::services::billing_service::LogView::Own,
            Default::default(),
            1,
            20,
        )
        .await
        .unwrap()
        .page
        .items
        .remove(0);
    assert_eq!(log.conversation_id, "CONV-WA-1");
    assert_eq!(log.billing_status, BillingStatus::Paid);
    assert_eq!(log.amount_paise, 780);
    assert_eq!(log.start_time.timestamp(), 1_736_500_000);

    let wallet = app
        .ctx
        .wallets
        .summary(&owner.as_requester(), owner.id)
        .await
        .unwrap();
    assert_eq!(wallet.balance_paise, 220);
}

#[tokio::test]
async fn test_unknown_owner_and_free_statuses_are_skipped() {
    let app = create_test_app().await;
    create_plan(&app.db, "Default", rates(115, 780, 115, 35), true).await;
    create_user_with_phone(&app.db, Role::User, Some("PNID-KNOWN")).await;

    for body in [
        status_payload("PNID-UNKNOWN", "CONV-X", true),
        status_payload("PNID-KNOWN", "CONV-FREE", false),
    ] {
        let signature = sign_payload(APP_SECRET, &body);
        let response = app
            .server
            .post("/webhooks/whatsapp")
            .content_type("application/json")
            .add_header("X-Hub-Signature-256", signature)
            .bytes(Bytes::from(body))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let report = response.json::<Value>();
        assert_eq!(report["data"]["skipped"], 1);
        assert_eq!(report["data"]["recorded"], 0);
    }
}
