// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, NaiveDate};
use uuid::Uuid;

use wabill::domain::models::billing_log::{BillingStatus, LogCriteria};
use wabill::domain::models::price_plan::MessageCategory;
use wabill::domain::models::user::Role;
use wabill::domain::models::wallet::{PostTransaction, TransactionType};
use wabill::domain::services::billing_service::{LogView, RecordCharge, CSV_COLUMNS};
use wabill::utils::errors::DomainError;

use super::helpers::{create_plan, create_test_app, create_user, rates, TestApp};

fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}

fn charge(user_id: Uuid, conversation_id: &str, category: MessageCategory) -> RecordCharge {
    RecordCharge {
        user_id,
        conversation_id: conversation_id.to_string(),
        category,
        recipient_number: "+91 98123 45678".to_string(),
        country_code: None,
        start_time: at("2025-01-10T10:00:00+05:30"),
        end_time: None,
        amount_paise: None,
        debit_wallet: false,
    }
}

async fn recharge(app: &TestApp, user_id: Uuid, amount: i64) {
    app.ctx
        .wallets
        .post_unchecked(PostTransaction {
            transaction_id: format!("rc-{}", Uuid::new_v4()),
            user_id,
            transaction_type: TransactionType::Recharge,
            amount_paise: amount,
            description: None,
            reference_id: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_same_conversation_is_billed_once() {
    let app = create_test_app().await;
    create_plan(&app.db, "Standard", rates(115, 780, 115, 35), true).await;
    let user = create_user(&app.db, Role::User).await;

    let first = app
        .ctx
        .billing
        .record_charge(charge(user.id, "CONV-1", MessageCategory::Marketing))
        .await
        .unwrap();
    assert!(first.created);
    assert_eq!(first.log.amount_paise, 780);
    assert_eq!(first.log.country_code.as_deref(), Some("IN"));
    assert_eq!(first.log.recipient_number, "919812345678");
    assert_eq!(first.log.billing_status, BillingStatus::Pending);

    let mut again = charge(user.id, "CONV-1", MessageCategory::Utility);
    again.amount_paise = Some(1);
    let second = app.ctx.billing.record_charge(again).await.unwrap();
    assert!(!second.created);
    assert_eq!(second.log.id, first.log.id);
    assert_eq!(second.log.category, MessageCategory::Marketing);
    assert_eq!(second.log.amount_paise, 780);
}

#[tokio::test]
async fn test_debit_marks_paid_or_failed() {
    let app = create_test_app().await;
    create_plan(&app.db, "Standard", rates(115, 780, 115, 35), true).await;
    let user = create_user(&app.db, Role::User).await;
    recharge(&app, user.id, 1_000).await;

    let mut paid = charge(user.id, "CONV-PAID", MessageCategory::Marketing);
    paid.debit_wallet = true;
    let paid = app.ctx.billing.record_charge(paid).await.unwrap();
    assert_eq!(paid.log.billing_status, BillingStatus::Paid);
    assert!(paid.log.wallet_tx_id.is_some());

    let requester = user.as_requester();
    let wallet = app.ctx.wallets.summary(&requester, user.id).await.unwrap();
    assert_eq!(wallet.balance_paise, 220);

    let mut failed = charge(user.id, "CONV-FAILED", MessageCategory::Marketing);
    failed.debit_wallet = true;
    let failed = app.ctx.billing.record_charge(failed).await.unwrap();
    assert!(failed.created);
    assert_eq!(failed.log.billing_status, BillingStatus::Failed);
    assert!(failed.log.wallet_tx_id.is_none());

    let wallet = app.ctx.wallets.summary(&requester, user.id).await.unwrap();
    assert_eq!(wallet.balance_paise, 220);
    let history = app
        .ctx
        .wallets
        .transactions(&requester, user.id, 1, 20)
        .await
        .unwrap();
    assert_eq!(history.total, 2);
}

#[tokio::test]
async fn test_status_transitions_are_enforced() {
    let app = create_test_app().await;
    create_plan(&app.db, "Standard", rates(115, 780, 115, 35), true).await;
    let admin = create_user(&app.db, Role::SuperAdmin).await;
    let user = create_user(&app.db, Role::User).await;

    let log = app
        .ctx
        .billing
        .record_charge(charge(user.id, "CONV-1", MessageCategory::Utility))
        .await
        .unwrap()
        .log;

    let updated = app
        .ctx
        .billing
        .update_status(&admin.as_requester(), log.id, BillingStatus::Paid)
        .await
        .unwrap();
    assert_eq!(updated.billing_status, BillingStatus::Paid);

    let err = app
        .ctx
        .billing
        .update_status(&admin.as_requester(), log.id, BillingStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidStatusTransition { .. }));

    let err = app
        .ctx
        .billing
        .update_status(&user.as_requester(), log.id, BillingStatus::Failed)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Authorization(_)));
}

#[tokio::test]
async fn test_filters_and_summary() {
    let app = create_test_app().await;
    create_plan(&app.db, "Standard", rates(115, 780, 115, 35), true).await;
    let user = create_user(&app.db, Role::User).await;
    let other = create_user(&app.db, Role::User).await;

    let mut jan_10 = charge(user.id, "CONV-A", MessageCategory::Marketing);
    jan_10.start_time = at("2025-01-10T23:30:00+00:00");
    let mut jan_11 = charge(user.id, "CONV-B", MessageCategory::Utility);
    jan_11.start_time = at("2025-01-11T08:00:00+00:00");
    let mut jan_20 = charge(user.id, "CONV-C", MessageCategory::Marketing);
    jan_20.start_time = at("2025-01-20T08:00:00+00:00");
    jan_20.recipient_number = "971501234567".to_string();
    let foreign = charge(other.id, "CONV-OTHER", MessageCategory::Marketing);

    for command in [jan_10, jan_11, jan_20, foreign] {
        app.ctx.billing.record_charge(command).await.unwrap();
    }

    let requester = user.as_requester();
    let all_mine = app
        .ctx
        .billing
        .list(&requester, LogView::Own, LogCriteria::default(), 1, 20)
        .await
        .unwrap();
    assert_eq!(all_mine.page.total, 3);
    assert!(all_mine.page.items.iter().all(|l| l.user_id == user.id));

    let marketing = all_mine
        .summary
        .iter()
        .find(|s| s.category == MessageCategory::Marketing)
        .unwrap();
    assert_eq!(marketing.count, 2);
    assert_eq!(marketing.total_paise, 1_560);

    let window = LogCriteria {
        start_date: NaiveDate::from_ymd_opt(2025, 1, 10),
        end_date: NaiveDate::from_ymd_opt(2025, 1, 11),
        ..Default::default()
    };
    let in_window = app
        .ctx
        .billing
        .list(&requester, LogView::Own, window, 1, 20)
        .await
        .unwrap();
    assert_eq!(in_window.page.total, 2);

    let by_country = LogCriteria {
        search: Some("ae".to_string()),
        ..Default::default()
    };
    let uae = app
        .ctx
        .billing
        .list(&requester, LogView::Own, by_country, 1, 20)
        .await
        .unwrap();
    assert_eq!(uae.page.total, 1);
    assert_eq!(uae.page.items[0].conversation_id, "CONV-C");

    let utility_only = LogCriteria {
        category: Some(MessageCategory::Utility),
        ..Default::default()
    };
    let utility = app
        .ctx
        .billing
        .list(&requester, LogView::Own, utility_only, 1, 20)
        .await
        .unwrap();
    assert_eq!(utility.page.total, 1);
    assert_eq!(utility.summary.len(), 1);
    assert_eq!(utility.summary[0].total_paise, 115);
}

#[tokio::test]
async fn test_pagination_reports_total() {
    let app = create_test_app().await;
    create_plan(&app.db, "Standard", rates(115, 780, 115, 35), true).await;
    let user = create_user(&app.db, Role::User).await;

    for i in 0..5 {
        app.ctx
            .billing
            .record_charge(charge(user.id, &format!("CONV-{}", i), MessageCategory::Service))
            .await
            .unwrap();
    }

    let page_two = app
        .ctx
        .billing
        .list(&user.as_requester(), LogView::Own, LogCriteria::default(), 2, 2)
        .await
        .unwrap();
    assert_eq!(page_two.page.total, 5);
    assert_eq!(page_two.page.items.len(), 2);
    assert_eq!(page_two.page.page, 2);
}

#[tokio::test]
async fn test_managed_view_and_csv_export() {
    let app = create_test_app().await;
    create_plan(&app.db, "Standard", rates(115, 780, 115, 35), true).await;
    let admin = create_user(&app.db, Role::SuperAdmin).await;
    let aggregator = create_user(&app.db, Role::Aggregator).await;
    let child = create_user(&app.db, Role::User).await;
    let stranger = create_user(&app.db, Role::User).await;

    app.ctx
        .users
        .link(
            &admin.as_requester(),
            aggregator.id,
            child.id,
            wabill::domain::models::user::RelationshipType::Business,
        )
        .await
        .unwrap();

    app.ctx
        .billing
        .record_charge(charge(child.id, "CONV-CHILD", MessageCategory::Authentication))
        .await
        .unwrap();
    app.ctx
        .billing
        .record_charge(charge(stranger.id, "CONV-STRANGER", MessageCategory::Authentication))
        .await
        .unwrap();

    let managed = app
        .ctx
        .billing
        .list(
            &aggregator.as_requester(),
            LogView::Managed,
            LogCriteria::default(),
            1,
            20,
        )
        .await
        .unwrap();
    assert_eq!(managed.page.total, 1);
    assert_eq!(managed.page.items[0].user_id, child.id);

    let err = app
        .ctx
        .billing
        .list(
            &aggregator.as_requester(),
            LogView::All,
            LogCriteria::default(),
            1,
            20,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Authorization(_)));

    let csv = app
        .ctx
        .billing
        .export_csv(&aggregator.as_requester(), LogView::Managed, LogCriteria::default())
        .await
        .unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(CSV_COLUMNS.join(",").as_str()));
    let row = lines.next().unwrap();
    assert!(row.starts_with("CONV-CHILD,authentication,919812345678,"));
    assert!(row.contains("1.150"));
    assert!(lines.next().is_none());
}
