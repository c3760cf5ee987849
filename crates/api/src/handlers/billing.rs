//! Handlers for plan status and the billing provider's webhook.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use kittie_core::billing::{parse_event, verify_signature};
use kittie_core::error::CoreError;
use kittie_db::models::profile::BillingSummary;
use kittie_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Header carrying `t=<unix>,v1=<hex hmac>`.
pub const SIGNATURE_HEADER: &str = "kittie-signature";

/// GET /api/v1/billing
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<BillingSummary>> {
    let profile = ProfileRepo::ensure(&state.pool, user.user_id, user.email.as_deref()).await?;
    let usage = ProfileRepo::usage(&state.pool, user.user_id).await?;
    Ok(Json(BillingSummary {
        plan: profile.plan,
        limits: profile.plan.limits(),
        usage,
    }))
}

/// POST /api/v1/billing/webhook
///
/// Verifies the delivery signature over the raw body, then moves the user
/// to the plan the event announces.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<StatusCode> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Missing {SIGNATURE_HEADER} header"
            )))
        })?;

    verify_signature(
        &state.config.billing_webhook_secret,
        signature,
        &body,
        chrono::Utc::now().timestamp(),
    )?;

    let event = parse_event(&body)?;
    let plan = event.resulting_plan();
    let profile = ProfileRepo::set_plan(&state.pool, event.user_id(), plan).await?;

    tracing::info!(user_id = %profile.user_id, plan = %plan, "Plan updated from billing webhook");
    Ok(StatusCode::NO_CONTENT)
}
