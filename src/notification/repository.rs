//! Handle notification-store requests.

use sqlx::{Pool, Postgres};

use crate::error::Result;
use crate::notification::{Event, NotificationView};

#[derive(Clone)]
pub struct NotificationRepository {
    pool: Pool<Postgres>,
}

impl NotificationRepository {
    /// Create a new [`NotificationRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert one notification record.
    pub async fn insert(&self, event: &Event) -> Result<()> {
        sqlx::query(
            "INSERT INTO notifications (from_id, to_id, kind) VALUES ($1, $2, $3)",
        )
        .bind(&event.from)
        .bind(&event.to)
        .bind(event.kind.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List every notification addressed to `user_id`, newest first, then
    /// mark them all read.
    ///
    /// Read-marking is a side effect of listing. The two statements are not
    /// atomic: a notification created between them may be marked read
    /// unseen, which is accepted for a "seen" flag.
    pub async fn list_and_mark_read(
        &self,
        user_id: &str,
    ) -> Result<Vec<NotificationView>> {
        let notifications = sqlx::query_as::<_, NotificationView>(
            r#"SELECT
                    n.id,
                    n.kind,
                    n.read,
                    n.created_at,
                    JSONB_BUILD_OBJECT(
                        'id', u.id,
                        'username', u.username,
                        'avatar', u.avatar
                    ) AS "from"
                FROM notifications n
                JOIN users u ON u.id = n.from_id
                WHERE n.to_id = $1
                ORDER BY n.id DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        sqlx::query("UPDATE notifications SET read = TRUE WHERE to_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(notifications)
    }

    /// Delete every notification addressed to `user_id`.
    pub async fn clear(&self, user_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM notifications WHERE to_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Notifications addressed to `user_id`, oldest first. Test seam.
    #[cfg(test)]
    pub async fn raw_for(&self, user_id: &str) -> Result<Vec<(String, String, bool)>> {
        Ok(sqlx::query_as::<_, (String, String, bool)>(
            "SELECT from_id, kind, read FROM notifications WHERE to_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
