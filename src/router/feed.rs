//! Home and liked feeds.

use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::AppState;
use crate::error::Result;
use crate::feed::FeedAssembler;
use crate::post::PostView;
use crate::user::User;

/// Posts from everyone the caller follows, newest first.
pub async fn following(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<PostView>>> {
    let posts = FeedAssembler::new(state.db.postgres.clone())
        .following_feed(&user.id)
        .await?;

    Ok(Json(posts))
}

/// Posts a user liked.
pub async fn liked(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<PostView>>> {
    let posts = FeedAssembler::new(state.db.postgres.clone())
        .liked_feed(&user_id)
        .await?;

    Ok(Json(posts))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::*;

    async fn feed_of(
        app: axum::Router,
        token: &str,
    ) -> Vec<PostView> {
        let response = make_request(
            Some(token),
            app,
            Method::GET,
            "/feed/following",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_follow_post_feed_unfollow_roundtrip(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        // admin follows bob.
        let response = make_request(
            Some("admin-token"),
            app.clone(),
            Method::POST,
            "/relationships/bob/toggle",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        // bob posts "hello".
        let response = make_request(
            Some("bob-token"),
            app.clone(),
            Method::POST,
            "/posts",
            json!({ "text": "hello" }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        // exactly that post shows up in admin's home feed.
        let posts = feed_of(app.clone(), "admin-token").await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].text.as_deref(), Some("hello"));
        assert_eq!(posts[0].owner.username, "bob");

        // admin unfollows bob, the feed empties.
        make_request(
            Some("admin-token"),
            app.clone(),
            Method::POST,
            "/relationships/bob/toggle",
            String::default(),
        )
        .await;
        assert!(feed_of(app, "admin-token").await.is_empty());
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_empty_following_is_empty_ok(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        assert!(feed_of(app, "carol-token").await.is_empty());
    }

    #[sqlx::test(fixtures(
        "../../fixtures/users.sql",
        "../../fixtures/posts.sql",
        "../../fixtures/engagement.sql"
    ))]
    async fn test_liked_feed_handler(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            Some("admin-token"),
            app.clone(),
            Method::GET,
            "/feed/liked/carol",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let posts: Vec<PostView> = serde_json::from_slice(&body).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, 1);

        let response = make_request(
            Some("admin-token"),
            app,
            Method::GET,
            "/feed/liked/nobody",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
