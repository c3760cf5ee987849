//! Integration tests for the billing webhook: signature checks and plan
//! changes.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use common::{body_json, create_kit, get, post_json, user_on_plan, WEBHOOK_SECRET};
use kittie_api::handlers::billing::SIGNATURE_HEADER;
use kittie_core::billing::signature_header;
use kittie_core::plan::PlanTier;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

async fn deliver(app: Router, body: &str, signature: Option<String>) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/billing/webhook")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

fn signed(body: &str) -> Option<String> {
    Some(signature_header(
        WEBHOOK_SECRET,
        chrono::Utc::now().timestamp(),
        body.as_bytes(),
    ))
}

fn upgrade_event(user_id: Uuid, plan: &str) -> String {
    serde_json::json!({
        "type": "subscription.updated",
        "user_id": user_id,
        "plan": plan,
    })
    .to_string()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signed_upgrade_lifts_kit_quota(pool: PgPool) {
    let user = user_on_plan(&pool, PlanTier::Free).await;
    create_kit(&pool, &user, "First").await;

    let body = upgrade_event(user.id, "pro");
    let app = common::build_test_app(pool.clone());
    let response = deliver(app, &body, signed(&body)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let summary = body_json(get(app, "/api/v1/billing", &user.token).await).await;
    assert_eq!(summary["plan"], "pro");

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/kits",
        &user.token,
        serde_json::json!({ "name": "Second" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancellation_downgrades_to_free(pool: PgPool) {
    let user = user_on_plan(&pool, PlanTier::Business).await;

    let body = serde_json::json!({
        "type": "subscription.deleted",
        "user_id": user.id,
    })
    .to_string();
    let app = common::build_test_app(pool.clone());
    let response = deliver(app, &body, signed(&body)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let summary = body_json(get(app, "/api/v1/billing", &user.token).await).await;
    assert_eq!(summary["plan"], "free");
    assert_eq!(summary["limits"]["max_kits"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_signature_returns_401(pool: PgPool) {
    let user = user_on_plan(&pool, PlanTier::Free).await;
    let body = upgrade_event(user.id, "business");

    let app = common::build_test_app(pool);
    let response = deliver(app, &body, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn forged_signature_does_not_change_plan(pool: PgPool) {
    let user = user_on_plan(&pool, PlanTier::Free).await;
    let body = upgrade_event(user.id, "business");
    let forged = signature_header("not-the-secret", chrono::Utc::now().timestamp(), body.as_bytes());

    let app = common::build_test_app(pool.clone());
    let response = deliver(app, &body, Some(forged)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let summary = body_json(get(app, "/api/v1/billing", &user.token).await).await;
    assert_eq!(summary["plan"], "free");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stale_signature_returns_401(pool: PgPool) {
    let user = user_on_plan(&pool, PlanTier::Free).await;
    let body = upgrade_event(user.id, "pro");
    let stale = signature_header(
        WEBHOOK_SECRET,
        chrono::Utc::now().timestamp() - 3600,
        body.as_bytes(),
    );

    let app = common::build_test_app(pool);
    let response = deliver(app, &body, Some(stale)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_event_type_returns_400(pool: PgPool) {
    let body = serde_json::json!({ "type": "invoice.paid", "user_id": Uuid::new_v4() }).to_string();

    let app = common::build_test_app(pool);
    let response = deliver(app, &body, signed(&body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
