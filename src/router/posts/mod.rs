//! Posts-related HTTP API.
mod comment;
mod create;
mod delete;
mod get;
mod like;

use axum::Router;
use axum::routing::{delete, get, post};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // `POST /posts` goes to `create`, `GET /posts` to every post.
        .route("/", post(create::handler).get(get::all))
        // `GET /posts/user/:USERNAME` goes to one user's posts.
        .route("/user/{username}", get(get::by_user))
        // `DELETE /posts/:ID` goes to `delete`. Owner only.
        .route("/{post_id}", delete(delete::handler))
        // `POST /posts/:ID/like` flips the like edge.
        .route("/{post_id}/like", post(like::handler))
        // `POST /posts/:ID/comments` appends a comment.
        .route("/{post_id}/comments", post(comment::handler))
}
