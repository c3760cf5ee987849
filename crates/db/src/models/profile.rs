//! Profile entity: the local record of a hosted-auth user.

use kittie_core::plan::{PlanLimits, PlanTier};
use kittie_core::types::{Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub user_id: UserId,
    pub email: Option<String>,
    pub full_name: Option<String>,
    #[sqlx(try_from = "String")]
    pub plan: PlanTier,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Resource usage counted against the plan limits.
#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct Usage {
    pub kit_count: i64,
    pub storage_bytes: i64,
}

/// Billing page payload: current plan, what it allows, and what is used.
#[derive(Debug, Clone, Serialize)]
pub struct BillingSummary {
    pub plan: PlanTier,
    pub limits: PlanLimits,
    pub usage: Usage,
}
