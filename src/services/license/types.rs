use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Subscribers allowed when no license key is configured
pub const FREE_TIER_MAX_SUBSCRIBERS: i64 = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseTier {
    Free,
    Starter,
    Professional,
    Enterprise,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Categorical label reported by the status endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    Active,
    GracePeriod,
    Expired,
    Invalid,
    NotInitialized,
}

/// Outcome of one validation call against the license server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseGrant {
    pub valid: bool,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub tier: LicenseTier,
    #[serde(default)]
    pub max_subscribers: i64,
    #[serde(default)]
    pub features: BTreeSet<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_lifetime: bool,
    #[serde(default)]
    pub message: String,
}

impl LicenseGrant {
    pub fn free_tier() -> Self {
        Self {
            valid: true,
            customer_name: String::new(),
            tier: LicenseTier::Free,
            max_subscribers: FREE_TIER_MAX_SUBSCRIBERS,
            features: BTreeSet::new(),
            expires_at: None,
            is_lifetime: true,
            message: "Running on the free tier".to_string(),
        }
    }
}

/// Snapshot served by the license info endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LicenseInfo {
    pub valid: bool,
    pub customer_name: String,
    pub tier: LicenseTier,
    pub max_subscribers: i64,
    pub features: BTreeSet<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_lifetime: bool,
    pub grace_period: bool,
    pub days_remaining: Option<i64>,
    pub message: String,
}

/// Compact view served by the status and revalidate endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LicenseStatusReport {
    pub valid: bool,
    pub grace_period: bool,
    pub license_status: LicenseStatus,
    pub read_only: bool,
    pub days_until_expiry: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_message: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum LicenseError {
    #[error("License server unreachable: {0}")]
    Unreachable(String),

    #[error("License server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid license server response: {0}")]
    InvalidResponse(String),
}
