//! Delete a post, owner only. Likes and comments go with it; releasing any
//! stored image belongs to the media service.

use axum::extract::{Path, State};
use axum::Extension;

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::post::PostRepository;
use crate::user::User;

pub async fn handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(post_id): Path<i64>,
) -> Result<()> {
    let posts = PostRepository::new(state.db.postgres.clone());

    let post = posts.find_by_id(post_id).await?;
    if post.user_id != user.id {
        return Err(ServerError::Forbidden);
    }

    posts.delete(post_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use sqlx::{Pool, Postgres};

    use crate::*;

    #[sqlx::test(fixtures("../../../fixtures/users.sql", "../../../fixtures/posts.sql"))]
    async fn test_owner_deletes_post(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            Some("bob-token"),
            app.clone(),
            Method::DELETE,
            "/posts/1",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        // gone now.
        let response = make_request(
            Some("bob-token"),
            app,
            Method::DELETE,
            "/posts/1",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql", "../../../fixtures/posts.sql"))]
    async fn test_non_owner_is_forbidden(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            Some("carol-token"),
            app,
            Method::DELETE,
            "/posts/1",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
