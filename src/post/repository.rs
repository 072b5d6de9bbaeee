//! Handle content-store requests.

use sqlx::{Pool, Postgres};

use crate::error::{Result, ServerError};
use crate::post::{Post, PostView};

#[derive(Clone)]
pub struct PostRepository {
    pool: Pool<Postgres>,
}

/// Which posts a view query selects.
#[derive(Debug, Clone)]
pub enum Scope {
    /// Every post on the instance.
    All,
    /// One post.
    ById,
    /// Posts owned by one user.
    Owner,
    /// Posts owned by anybody the user follows.
    FolloweesOf,
    /// Posts the user liked.
    LikedBy,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Scope::All => write!(f, ""),
            Scope::ById => write!(f, "WHERE p.id = $1"),
            Scope::Owner => write!(f, "WHERE p.user_id = $1"),
            Scope::FolloweesOf => write!(
                f,
                "WHERE p.user_id IN (SELECT target_id FROM follows WHERE follower_id = $1)"
            ),
            Scope::LikedBy => write!(
                f,
                "WHERE p.id IN (SELECT post_id FROM post_likes WHERE user_id = $1)"
            ),
        }
    }
}

fn get_views_query(scope: Scope) -> String {
    format!(
        r#"SELECT
                p.id,
                p.text,
                p.image,
                p.created_at,
                JSONB_BUILD_OBJECT(
                    'id', u.id,
                    'username', u.username,
                    'fullName', u.full_name,
                    'avatar', u.avatar
                ) AS owner,
                COALESCE((
                    SELECT JSONB_AGG(pl.user_id ORDER BY pl.created_at)
                    FROM post_likes pl
                    WHERE pl.post_id = p.id
                ), '[]'::JSONB) AS likes,
                COALESCE((
                    SELECT JSONB_AGG(
                        JSONB_BUILD_OBJECT(
                            'user', JSONB_BUILD_OBJECT(
                                'id', cu.id,
                                'username', cu.username,
                                'fullName', cu.full_name,
                                'avatar', cu.avatar
                            ),
                            'text', c.text,
                            'createdAt', c.created_at
                        )
                        ORDER BY c.id
                    )
                    FROM comments c
                    JOIN users cu ON cu.id = c.user_id
                    WHERE c.post_id = p.id
                ), '[]'::JSONB) AS comments
            FROM posts p
            JOIN users u ON u.id = p.user_id
            {scope}
            ORDER BY p.created_at DESC
            "#
    )
}

impl PostRepository {
    /// Create a new [`PostRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a new [`Post`] and return it as stored.
    pub async fn insert(
        &self,
        owner_id: &str,
        text: Option<&str>,
        image: Option<&str>,
    ) -> Result<Post> {
        Ok(sqlx::query_as::<_, Post>(
            r#"INSERT INTO posts (user_id, text, image) VALUES ($1, $2, $3)
                RETURNING id, user_id, text, image, created_at"#,
        )
        .bind(owner_id)
        .bind(text)
        .bind(image)
        .fetch_one(&self.pool)
        .await?)
    }

    /// Find a post by id.
    pub async fn find_by_id(&self, post_id: i64) -> Result<Post> {
        sqlx::query_as::<_, Post>(
            "SELECT id, user_id, text, image, created_at FROM posts WHERE id = $1",
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServerError::NotFound { resource: "post" })
    }

    /// Delete a post. Likes and comments go with it.
    pub async fn delete(&self, post_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Current likes set of a post, oldest like first.
    pub async fn likes(&self, post_id: i64) -> Result<Vec<String>> {
        Ok(sqlx::query_scalar(
            "SELECT user_id FROM post_likes WHERE post_id = $1 ORDER BY created_at",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// One post with its joins.
    pub async fn view(&self, post_id: i64) -> Result<PostView> {
        let query = get_views_query(Scope::ById);

        sqlx::query_as::<_, PostView>(&query)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ServerError::NotFound { resource: "post" })
    }

    /// Every post selected by `scope`, newest first, with joins.
    pub async fn views(
        &self,
        scope: Scope,
        user_id: &str,
    ) -> Result<Vec<PostView>> {
        let query = get_views_query(scope);

        Ok(sqlx::query_as::<_, PostView>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Every post on the instance, newest first, with joins.
    pub async fn all_views(&self) -> Result<Vec<PostView>> {
        let query = get_views_query(Scope::All);

        Ok(sqlx::query_as::<_, PostView>(&query)
            .fetch_all(&self.pool)
            .await?)
    }
}
