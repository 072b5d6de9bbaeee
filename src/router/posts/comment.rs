use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::engagement::EngagementService;
use crate::error::Result;
use crate::post::PostView;
use crate::router::Valid;
use crate::user::User;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(length(
        min = 1,
        max = 500,
        message = "Comment must be 1 to 500 characters long."
    ))]
    pub text: String,
}

/// Handler to comment on a post.
///
/// Responds with the updated post. Comments never fan out a notification.
pub async fn handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(post_id): Path<i64>,
    Valid(body): Valid<Body>,
) -> Result<Json<PostView>> {
    let post = EngagementService::new(state.db.postgres.clone())
        .append_comment(&user.id, post_id, &body.text)
        .await?;

    Ok(Json(post))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::*;

    #[sqlx::test(fixtures("../../../fixtures/users.sql", "../../../fixtures/posts.sql"))]
    async fn test_comment_handler(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            Some("carol-token"),
            app,
            Method::POST,
            "/posts/1/comments",
            json!({ "text": "nice" }).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: PostView = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.id, 1);
        assert_eq!(body.comments.len(), 1);
        assert_eq!(body.comments[0].text, "nice");
        assert_eq!(body.comments[0].user.username, "carol");
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql", "../../../fixtures/posts.sql"))]
    async fn test_whitespace_comment_is_bad_request(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            Some("carol-token"),
            app,
            Method::POST,
            "/posts/1/comments",
            json!({ "text": "   " }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_comment_unknown_post_is_not_found(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            Some("carol-token"),
            app,
            Method::POST,
            "/posts/9/comments",
            json!({ "text": "hello" }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
