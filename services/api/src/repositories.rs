//! Repositories for database operations

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::models::User;

pub mod video;

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    ///
    /// Email and API key uniqueness is enforced by database constraints;
    /// a concurrent duplicate insert surfaces as a unique-violation error.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: Option<&str>,
        api_key: &str,
    ) -> Result<User> {
        info!("Creating new user: {}", email);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, api_key)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, name, api_key, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(api_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, api_key, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by API key (exact match)
    pub async fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, api_key, created_at
            FROM users
            WHERE api_key = $1
            "#,
        )
        .bind(api_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

}
