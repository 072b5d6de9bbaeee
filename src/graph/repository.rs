//! Handle follow-edge requests.

use sqlx::{Pool, Postgres};

use crate::error::{Result, ServerError};

#[derive(Clone)]
pub struct FollowRepository {
    pool: Pool<Postgres>,
}

impl FollowRepository {
    /// Create a new [`FollowRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Whether `follower_id` currently follows `target_id`. Test seam; the
    /// toggle re-reads membership inside its own transaction.
    #[cfg(test)]
    pub async fn is_following(
        &self,
        follower_id: &str,
        target_id: &str,
    ) -> Result<bool> {
        let following: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND target_id = $2)",
        )
        .bind(follower_id)
        .bind(target_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(following)
    }

    /// Flip the follow edge and return the new state (true = now following).
    ///
    /// Membership test and edge write run in one transaction. A concurrent
    /// toggle on the same edge makes the write affect zero rows; nothing is
    /// committed and the conflict is surfaced instead of leaving the caller
    /// believing a stale state.
    pub async fn toggle(
        &self,
        follower_id: &str,
        target_id: &str,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let following: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND target_id = $2)",
        )
        .bind(follower_id)
        .bind(target_id)
        .fetch_one(&mut *tx)
        .await?;

        let result = if following {
            sqlx::query(
                "DELETE FROM follows WHERE follower_id = $1 AND target_id = $2",
            )
            .bind(follower_id)
            .bind(target_id)
            .execute(&mut *tx)
            .await?
        } else {
            sqlx::query(
                r#"INSERT INTO follows (follower_id, target_id) VALUES ($1, $2)
                    ON CONFLICT DO NOTHING"#,
            )
            .bind(follower_id)
            .bind(target_id)
            .execute(&mut *tx)
            .await?
        };

        if result.rows_affected() != 1 {
            tx.rollback().await?;
            return Err(ServerError::PartialEngagement);
        }

        tx.commit().await?;

        Ok(!following)
    }

    /// Ids of everyone `user_id` follows.
    pub async fn following_ids(&self, user_id: &str) -> Result<Vec<String>> {
        Ok(sqlx::query_scalar(
            "SELECT target_id FROM follows WHERE follower_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Ids of everyone following `user_id`. Test seam for edge symmetry.
    #[cfg(test)]
    pub async fn follower_ids(&self, user_id: &str) -> Result<Vec<String>> {
        Ok(sqlx::query_scalar(
            "SELECT follower_id FROM follows WHERE target_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
