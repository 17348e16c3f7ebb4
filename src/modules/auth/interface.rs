use async_trait::async_trait;

use super::model::User;
use crate::error::ApiError;

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// User persistence as seen by the 2FA handlers.
///
/// The three 2FA writes are the only way to touch the 2FA columns, and each
/// keeps "enabled implies a non-empty secret" true on its own:
/// - `set_two_factor_secret` stores a new secret and resets the enabled flag
/// - `enable_two_factor` only turns on the secret the caller verified, and
///   refuses when no secret or a different one is stored
/// - `clear_two_factor` drops secret and flag in a single statement
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn set_two_factor_secret(&self, user_id: &str, secret: &str) -> Result<()>;
    async fn enable_two_factor(&self, user_id: &str, verified_secret: &str) -> Result<()>;
    async fn clear_two_factor(&self, user_id: &str) -> Result<()>;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("User not found")]
    UserNotFound,

    #[error("2FA secret is not set")]
    SecretNotSet,

    #[error("2FA secret was replaced before it could be enabled")]
    SecretMismatch,

    #[error("2FA secret must not be empty")]
    EmptySecret,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // token outlived its user
            RepositoryError::UserNotFound => ApiError::Unauthorized,
            RepositoryError::SecretNotSet => ApiError::NotSetUp,
            // the code was checked against a secret that is no longer stored
            RepositoryError::SecretMismatch => ApiError::InvalidCode,
            RepositoryError::EmptySecret => ApiError::Internal("empty 2FA secret".to_string()),
            RepositoryError::Database(e) => ApiError::Storage(e),
        }
    }
}
