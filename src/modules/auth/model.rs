use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub two_factor_secret: Option<String>,
    pub two_factor_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoFactorState {
    Unset,
    PendingVerification,
    Enabled,
}

impl User {
    /// Stored secret, treating an empty column the same as NULL.
    pub fn two_factor_secret(&self) -> Option<&str> {
        self.two_factor_secret.as_deref().filter(|s| !s.is_empty())
    }

    pub fn two_factor_state(&self) -> TwoFactorState {
        match (self.two_factor_secret(), self.two_factor_enabled) {
            (Some(_), true) => TwoFactorState::Enabled,
            (Some(_), false) => TwoFactorState::PendingVerification,
            (None, _) => TwoFactorState::Unset,
        }
    }
}
