//! Handle like-edge and comment requests.

use sqlx::{Pool, Postgres};

use crate::error::{Result, ServerError};

#[derive(Clone)]
pub struct EngagementRepository {
    pool: Pool<Postgres>,
}

impl EngagementRepository {
    /// Create a new [`EngagementRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Flip the like edge and return the new state (true = now liked).
    ///
    /// Membership test and edge write run in one transaction; a concurrent
    /// toggle making the write affect zero rows is rolled back and surfaced,
    /// never half-applied.
    pub async fn toggle_like(
        &self,
        post_id: i64,
        user_id: &str,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let liked: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM post_likes WHERE post_id = $1 AND user_id = $2)",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let result = if liked {
            sqlx::query(
                "DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2",
            )
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
        } else {
            sqlx::query(
                r#"INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2)
                    ON CONFLICT DO NOTHING"#,
            )
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
        };

        if result.rows_affected() != 1 {
            tx.rollback().await?;
            return Err(ServerError::PartialEngagement);
        }

        tx.commit().await?;

        Ok(!liked)
    }

    /// Append one comment to a post. Ordering is insertion order, never
    /// reordered or deduplicated.
    pub async fn append_comment(
        &self,
        post_id: i64,
        user_id: &str,
        text: &str,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO comments (post_id, user_id, text) VALUES ($1, $2, $3)",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(text)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Post ids `user_id` liked. Test seam for the cross-index property.
    #[cfg(test)]
    pub async fn liked_post_ids(&self, user_id: &str) -> Result<Vec<i64>> {
        Ok(sqlx::query_scalar(
            "SELECT post_id FROM post_likes WHERE user_id = $1 ORDER BY post_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
