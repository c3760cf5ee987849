//! Subscription plan tiers and the quotas attached to them.
//!
//! The billing provider owns payment; this module only knows which tier a
//! user is on and what that tier allows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * MIB;

/// A subscription tier, stored as lowercase text in `profiles.plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Pro,
    Business,
}

/// Limits enforced for a [`PlanTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanLimits {
    /// Maximum number of kits. `None` means unlimited.
    pub max_kits: Option<u32>,
    /// Largest single upload accepted.
    pub max_file_bytes: u64,
    /// Total bytes of stored assets across all kits.
    pub max_storage_bytes: u64,
    /// Whether public pages and embeds carry the "Made with Kittie" footer.
    pub show_branding: bool,
}

impl PlanTier {
    pub const ALL: [PlanTier; 3] = [PlanTier::Free, PlanTier::Pro, PlanTier::Business];

    pub fn as_str(self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
            PlanTier::Business => "business",
        }
    }

    pub fn limits(self) -> PlanLimits {
        match self {
            PlanTier::Free => PlanLimits {
                max_kits: Some(1),
                max_file_bytes: 5 * MIB,
                max_storage_bytes: 100 * MIB,
                show_branding: true,
            },
            PlanTier::Pro => PlanLimits {
                max_kits: Some(10),
                max_file_bytes: 25 * MIB,
                max_storage_bytes: 5 * GIB,
                show_branding: false,
            },
            PlanTier::Business => PlanLimits {
                max_kits: None,
                max_file_bytes: 100 * MIB,
                max_storage_bytes: 50 * GIB,
                show_branding: false,
            },
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PlanTier {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for PlanTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(PlanTier::Free),
            "pro" => Ok(PlanTier::Pro),
            "business" => Ok(PlanTier::Business),
            other => Err(CoreError::Validation(format!(
                "Unknown plan '{other}'. Must be one of: free, pro, business"
            ))),
        }
    }
}

/// Reject kit creation once the user already owns `current_count` kits and
/// the tier's cap has been reached.
pub fn ensure_can_create_kit(tier: PlanTier, current_count: i64) -> Result<(), CoreError> {
    match tier.limits().max_kits {
        Some(max) if current_count >= i64::from(max) => Err(CoreError::QuotaExceeded(format!(
            "The {tier} plan allows {max} kit{}. Upgrade to create more.",
            if max == 1 { "" } else { "s" }
        ))),
        _ => Ok(()),
    }
}

/// Reject an upload that is too large on its own or would push the user's
/// total stored bytes past the tier's allowance.
pub fn ensure_upload_fits(tier: PlanTier, file_bytes: u64, used_bytes: u64) -> Result<(), CoreError> {
    let limits = tier.limits();

    if file_bytes > limits.max_file_bytes {
        return Err(CoreError::QuotaExceeded(format!(
            "File is {} bytes; the {tier} plan accepts files up to {} bytes",
            file_bytes, limits.max_file_bytes
        )));
    }

    if used_bytes.saturating_add(file_bytes) > limits.max_storage_bytes {
        return Err(CoreError::QuotaExceeded(format!(
            "Storage limit of {} bytes for the {tier} plan would be exceeded",
            limits.max_storage_bytes
        )));
    }

    Ok(())
}
