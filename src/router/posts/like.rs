use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::AppState;
use crate::engagement::EngagementService;
use crate::error::Result;
use crate::user::User;

/// Handler to like or unlike a post.
///
/// Responds with the post's updated likes set.
pub async fn handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<String>>> {
    let likes = EngagementService::new(state.db.postgres.clone())
        .toggle_like(&user.id, post_id)
        .await?;

    Ok(Json(likes))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    use crate::*;

    #[sqlx::test(fixtures("../../../fixtures/users.sql", "../../../fixtures/posts.sql"))]
    async fn test_like_handler_returns_likes_set(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            Some("admin-token"),
            app.clone(),
            Method::POST,
            "/posts/1/like",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let likes: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert_eq!(likes, vec!["admin"]);

        let response = make_request(
            Some("admin-token"),
            app,
            Method::POST,
            "/posts/1/like",
            String::default(),
        )
        .await;
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let likes: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert!(likes.is_empty());
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_like_unknown_post_is_not_found(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            Some("admin-token"),
            app,
            Method::POST,
            "/posts/42/like",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
