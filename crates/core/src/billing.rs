//! Billing-provider webhook verification and event parsing.
//!
//! The provider signs every delivery with a header of the form
//! `t=<unix seconds>,v1=<hex hmac>`, where the HMAC-SHA256 is computed over
//! `"{t}.{raw body}"` with the shared webhook secret. Payment itself never
//! touches this service; webhooks only tell us which plan a user is on.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::error::CoreError;
use crate::plan::PlanTier;
use crate::types::UserId;

type HmacSha256 = Hmac<Sha256>;

/// Deliveries older (or newer) than this many seconds are rejected.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Plan changes announced by the billing provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum BillingEvent {
    #[serde(rename = "subscription.updated")]
    SubscriptionUpdated { user_id: UserId, plan: PlanTier },
    #[serde(rename = "subscription.deleted")]
    SubscriptionDeleted { user_id: UserId },
}

impl BillingEvent {
    pub fn user_id(&self) -> UserId {
        match self {
            BillingEvent::SubscriptionUpdated { user_id, .. }
            | BillingEvent::SubscriptionDeleted { user_id } => *user_id,
        }
    }

    /// The plan the user should be on after this event.
    pub fn resulting_plan(&self) -> PlanTier {
        match self {
            BillingEvent::SubscriptionUpdated { plan, .. } => *plan,
            BillingEvent::SubscriptionDeleted { .. } => PlanTier::Free,
        }
    }
}

/// Compute the hex signature for `payload` sent at `timestamp`.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Build a signature header value, as the provider would send it.
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    format!("t={timestamp},v1={}", compute_signature(secret, timestamp, payload))
}

/// Verify a signature header against the raw request body.
///
/// `now` is the current unix time; passing it in keeps this function pure.
pub fn verify_signature(
    secret: &str,
    header: &str,
    payload: &[u8],
    now: i64,
) -> Result<(), CoreError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| CoreError::Unauthorized("Signature header has no timestamp".into()))?;

    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(CoreError::Unauthorized(
            "Signature timestamp outside tolerance".into(),
        ));
    }

    let valid = signatures.iter().any(|candidate| {
        let Some(bytes) = hex::decode(candidate) else {
            return false;
        };
        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.verify_slice(&bytes).is_ok()
    });

    if valid {
        Ok(())
    } else {
        Err(CoreError::Unauthorized("Invalid webhook signature".into()))
    }
}

/// Parse a verified webhook body.
pub fn parse_event(payload: &[u8]) -> Result<BillingEvent, CoreError> {
    serde_json::from_slice(payload)
        .map_err(|e| CoreError::Validation(format!("Unrecognised billing event: {e}")))
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
            .collect()
    }
}
