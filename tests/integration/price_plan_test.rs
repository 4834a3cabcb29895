// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, Utc};

use wabill::domain::models::price_plan::{MessageCategory, PricePlanPatch, PriceSource};
use wabill::domain::models::user::{RelationshipType, Role};
use wabill::domain::repositories::price_plan_repository::PricePlanRepository;
use wabill::domain::services::plan_service::CreatePlan;
use wabill::infrastructure::repositories::price_plan_repo_impl::PricePlanRepositoryImpl;
use wabill::utils::errors::DomainError;

use super::helpers::{create_plan, create_test_app, create_user, rates, test_db};

#[tokio::test]
async fn test_only_one_default_plan() {
    let db = test_db().await;
    let plans = PricePlanRepositoryImpl::new(db.clone());

    let first = create_plan(&db, "Starter", rates(100, 700, 100, 30), true).await;
    let second = create_plan(&db, "Growth", rates(90, 650, 90, 25), true).await;

    let default = plans.find_default().await.unwrap().unwrap();
    assert_eq!(default.id, second.id);
    assert!(!plans.find_by_id(first.id).await.unwrap().unwrap().is_default);

    plans.set_default(first.id).await.unwrap();
    let all = plans.list(None).await.unwrap();
    assert_eq!(all.iter().filter(|p| p.is_default).count(), 1);
    assert_eq!(plans.find_default().await.unwrap().unwrap().id, first.id);
}

#[tokio::test]
async fn test_update_plan_rates() {
    let db = test_db().await;
    let plans = PricePlanRepositoryImpl::new(db.clone());
    let plan = create_plan(&db, "Starter", rates(100, 700, 100, 30), false).await;

    let updated = plans
        .update(
            plan.id,
            PricePlanPatch {
                marketing_paise: Some(720),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.rates.marketing_paise, 720);
    assert_eq!(updated.rates.utility_paise, 100);
    assert_eq!(updated.name, "Starter");
}

#[tokio::test]
async fn test_override_upsert_replaces_amount() {
    let db = test_db().await;
    let plans = PricePlanRepositoryImpl::new(db.clone());
    let plan = create_plan(&db, "Starter", rates(100, 700, 100, 30), false).await;

    let first = plans
        .upsert_override(plan.id, "AE", MessageCategory::Marketing, 900)
        .await
        .unwrap();
    let second = plans
        .upsert_override(plan.id, "AE", MessageCategory::Marketing, 950)
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.amount_paise, 950);
    assert_eq!(plans.list_overrides(plan.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_resolution_prefers_assignment_then_override() {
    let app = create_test_app().await;
    let default = create_plan(&app.db, "Default", rates(115, 780, 115, 35), true).await;
    let premium = create_plan(&app.db, "Premium", rates(100, 600, 100, 30), false).await;
    let admin = create_user(&app.db, Role::SuperAdmin).await;
    let user = create_user(&app.db, Role::User).await;

    let quote = app
        .ctx
        .pricing
        .resolve_price(user.id, MessageCategory::Marketing, Some("IN"))
        .await
        .unwrap();
    assert_eq!(quote.plan_id, default.id);
    assert_eq!(quote.amount_paise, 780);
    assert_eq!(quote.source, PriceSource::BaseRate);

    app.ctx
        .plans
        .assign(&admin.as_requester(), user.id, premium.id, None)
        .await
        .unwrap();
    app.ctx
        .plans
        .upsert_override(&admin.as_requester(), premium.id, "ae", MessageCategory::Marketing, 850)
        .await
        .unwrap();

    let base = app
        .ctx
        .pricing
        .resolve_price(user.id, MessageCategory::Marketing, Some("IN"))
        .await
        .unwrap();
    assert_eq!(base.plan_id, premium.id);
    assert_eq!(base.amount_paise, 600);

    let overridden = app
        .ctx
        .pricing
        .resolve_price(user.id, MessageCategory::Marketing, Some("ae"))
        .await
        .unwrap();
    assert_eq!(overridden.amount_paise, 850);
    assert_eq!(overridden.source, PriceSource::CountryOverride);
}

#[tokio::test]
async fn test_future_assignment_takes_effect_later() {
    let app = create_test_app().await;
    let default = create_plan(&app.db, "Default", rates(115, 780, 115, 35), true).await;
    let later = create_plan(&app.db, "Later", rates(50, 500, 50, 20), false).await;
    let admin = create_user(&app.db, Role::SuperAdmin).await;
    let user = create_user(&app.db, Role::User).await;

    let starts = Utc::now() + Duration::days(7);
    app.ctx
        .plans
        .assign(
            &admin.as_requester(),
            user.id,
            later.id,
            Some(starts.fixed_offset()),
        )
        .await
        .unwrap();

    let today = app.ctx.pricing.current_plan(user.id).await.unwrap();
    assert_eq!(today.id, default.id);

    let next_week = app
        .ctx
        .pricing
        .plan_at(user.id, (starts + Duration::hours(1)).fixed_offset())
        .await
        .unwrap();
    assert_eq!(next_week.id, later.id);
}

#[tokio::test]
async fn test_no_plan_available() {
    let app = create_test_app().await;
    let user = create_user(&app.db, Role::User).await;

    let err = app
        .ctx
        .pricing
        .resolve_price(user.id, MessageCategory::Utility, None)
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::NoPlanAvailable(user.id));
}

#[tokio::test]
async fn test_aggregator_plans_respect_floor_and_ownership() {
    let app = create_test_app().await;
    create_plan(&app.db, "Default", rates(115, 780, 115, 35), true).await;
    let admin = create_user(&app.db, Role::SuperAdmin).await;
    let aggregator = create_user(&app.db, Role::Aggregator).await;
    let child = create_user(&app.db, Role::User).await;
    let outsider = create_user(&app.db, Role::User).await;
    app.ctx
        .users
        .link(&admin.as_requester(), aggregator.id, child.id, RelationshipType::Business)
        .await
        .unwrap();

    let err = app
        .ctx
        .plans
        .create(
            &aggregator.as_requester(),
            CreatePlan {
                name: "Cheap".into(),
                rates: rates(115, 700, 115, 35),
                is_default: false,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::BelowFloorPrice {
            category: MessageCategory::Marketing,
            floor_paise: 780,
            requested_paise: 700,
        }
    );

    let at_floor = app
        .ctx
        .plans
        .create(
            &aggregator.as_requester(),
            CreatePlan {
                name: "At floor".into(),
                rates: rates(115, 780, 115, 35),
                is_default: false,
            },
        )
        .await;
    assert!(at_floor.is_ok());

    let resale = app
        .ctx
        .plans
        .create(
            &aggregator.as_requester(),
            CreatePlan {
                name: "Resale".into(),
                rates: rates(130, 800, 130, 40),
                is_default: true,
            },
        )
        .await
        .unwrap();
    assert!(!resale.is_default);
    assert_eq!(resale.created_by, Some(aggregator.id));

    app.ctx
        .plans
        .assign(&aggregator.as_requester(), child.id, resale.id, None)
        .await
        .unwrap();
    let err = app
        .ctx
        .plans
        .assign(&aggregator.as_requester(), outsider.id, resale.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Authorization(_)));

    let visible = app.ctx.plans.list(&aggregator.as_requester()).await.unwrap();
    assert_eq!(visible.len(), 2);
    assert!(visible.iter().all(|p| p.created_by == Some(aggregator.id)));
}
