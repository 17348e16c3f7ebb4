use async_trait::async_trait;
use sqlx::{MySql, Pool};

use super::interface::{RepositoryError, Result, UserRepository};
use super::model::User;

pub struct MySqlUserRepository {
    pool: Pool<MySql>,
}

impl MySqlUserRepository {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// An UPDATE that reports no rows may still have hit an existing user
    /// (MySQL can count changed rather than matched rows, and conditional
    /// updates miss on purpose). Re-read to tell the cases apart.
    async fn require_user(&self, user_id: &str) -> Result<User> {
        self.find_by_id(user_id)
            .await?
            .ok_or(RepositoryError::UserNotFound)
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, two_factor_secret, two_factor_enabled, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn set_two_factor_secret(&self, user_id: &str, secret: &str) -> Result<()> {
        if secret.is_empty() {
            return Err(RepositoryError::EmptySecret);
        }

        let result = sqlx::query(
            "UPDATE users SET two_factor_secret = ?, two_factor_enabled = FALSE WHERE id = ?",
        )
        .bind(secret)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            self.require_user(user_id).await?;
        }

        Ok(())
    }

    async fn enable_two_factor(&self, user_id: &str, verified_secret: &str) -> Result<()> {
        if verified_secret.is_empty() {
            return Err(RepositoryError::SecretNotSet);
        }

        let result = sqlx::query(
            "UPDATE users SET two_factor_enabled = TRUE WHERE id = ? AND two_factor_secret = ?",
        )
        .bind(user_id)
        .bind(verified_secret)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let user = self.require_user(user_id).await?;
            match user.two_factor_secret() {
                None => return Err(RepositoryError::SecretNotSet),
                Some(stored) if stored != verified_secret => {
                    return Err(RepositoryError::SecretMismatch)
                }
                // already enabled with this secret
                Some(_) => {}
            }
        }

        Ok(())
    }

    async fn clear_two_factor(&self, user_id: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET two_factor_secret = NULL, two_factor_enabled = FALSE WHERE id = ?",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            self.require_user(user_id).await?;
        }

        Ok(())
    }
}
