//! Handle identity-store requests.

use sqlx::{Pool, Postgres};

use crate::error::Result;
use crate::user::User;

const USER_COLUMNS: &str =
    "id, username, email, password, full_name, bio, link, avatar, cover, created_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Find a user by `id` field.
    pub async fn find_by_id(&self, user_id: &str) -> Result<User> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(crate::error::ServerError::NotFound { resource: "user" })
    }

    /// Find a user by `username` field.
    pub async fn find_by_username(&self, username: &str) -> Result<User> {
        let query =
            format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(crate::error::ServerError::NotFound { resource: "user" })
    }

    /// Resolve a bearer token to its user.
    ///
    /// Tokens are issued by the authentication service; this side only ever
    /// reads them.
    pub async fn find_by_token(&self, token: &str) -> Result<User> {
        let query = format!(
            r#"SELECT {USER_COLUMNS} FROM users
                WHERE id = (SELECT user_id FROM tokens WHERE token = $1)"#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(crate::error::ServerError::Unauthorized)
    }

    /// Check that a user id resolves.
    pub async fn exists(&self, user_id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Draw a random sample of users, excluding `user_id` itself.
    ///
    /// The sample is taken BEFORE any relationship filtering so that the
    /// selection probability matches the sampler the feature shipped with.
    pub async fn sample_excluding(
        &self,
        user_id: &str,
        sample_size: i64,
    ) -> Result<Vec<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id <> $1
                ORDER BY RANDOM() LIMIT $2"
        );

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(sample_size)
            .fetch_all(&self.pool)
            .await?)
    }
}
