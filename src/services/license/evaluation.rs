use chrono::{DateTime, Duration, Utc};

use super::types::{LicenseGrant, LicenseStatus, LicenseStatusReport};

/// Grace and warning windows, in days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LicensePolicy {
    pub grace_days: i64,
    pub warning_days: i64,
}

impl Default for LicensePolicy {
    fn default() -> Self {
        Self {
            grace_days: 7,
            warning_days: 30,
        }
    }
}

/// Where a license stands at a given instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub status: LicenseStatus,
    /// None for lifetime licenses; negative once past expiry
    pub days_until_expiry: Option<i64>,
    /// Whole days until the license stops working, 0 once it has;
    /// None when it never stops (lifetime)
    pub days_remaining: Option<i64>,
    pub warning: Option<String>,
}

impl Evaluation {
    pub fn not_initialized() -> Self {
        Self {
            status: LicenseStatus::NotInitialized,
            days_until_expiry: None,
            days_remaining: Some(0),
            warning: Some("License not initialized".to_string()),
        }
    }

    pub fn valid(&self) -> bool {
        matches!(self.status, LicenseStatus::Active | LicenseStatus::GracePeriod)
    }

    pub fn grace_period(&self) -> bool {
        self.status == LicenseStatus::GracePeriod
    }

    pub fn read_only(&self) -> bool {
        !self.valid()
    }

    pub fn report(&self) -> LicenseStatusReport {
        LicenseStatusReport {
            valid: self.valid(),
            grace_period: self.grace_period(),
            license_status: self.status,
            read_only: self.read_only(),
            days_until_expiry: self.days_until_expiry,
            warning_message: self.warning.clone(),
        }
    }
}

pub fn evaluate(grant: &LicenseGrant, policy: &LicensePolicy, now: DateTime<Utc>) -> Evaluation {
    if !grant.valid {
        let warning = if grant.message.is_empty() {
            "License is invalid. The system is in read-only mode.".to_string()
        } else {
            format!("License is invalid: {}. The system is in read-only mode.", grant.message)
        };
        return Evaluation {
            status: LicenseStatus::Invalid,
            days_until_expiry: None,
            days_remaining: Some(0),
            warning: Some(warning),
        };
    }

    let expires_at = match grant.expires_at {
        Some(expires_at) if !grant.is_lifetime => expires_at,
        _ => {
            return Evaluation {
                status: LicenseStatus::Active,
                days_until_expiry: None,
                days_remaining: None,
                warning: None,
            }
        }
    };

    let days_until_expiry = (expires_at - now).num_days();

    if now < expires_at {
        let warning = (days_until_expiry <= policy.warning_days).then(|| match days_until_expiry {
            0 => "License expires today".to_string(),
            1 => "License expires in 1 day".to_string(),
            days => format!("License expires in {} days", days),
        });
        return Evaluation {
            status: LicenseStatus::Active,
            days_until_expiry: Some(days_until_expiry),
            days_remaining: Some(days_until_expiry),
            warning,
        };
    }

    let grace_ends_at = expires_at + Duration::days(policy.grace_days);
    let expired_on = expires_at.format("%Y-%m-%d");

    if now < grace_ends_at {
        let grace_days_left = (grace_ends_at - now).num_days();
        return Evaluation {
            status: LicenseStatus::GracePeriod,
            days_until_expiry: Some(days_until_expiry),
            days_remaining: Some(grace_days_left),
            warning: Some(format!(
                "License expired on {}. Grace period ends in {} day(s); renew to avoid read-only mode.",
                expired_on, grace_days_left
            )),
        };
    }

    Evaluation {
        status: LicenseStatus::Expired,
        days_until_expiry: Some(days_until_expiry),
        days_remaining: Some(0),
        warning: Some(format!(
            "License expired on {}. The system is in read-only mode.",
            expired_on
        )),
    }
}
