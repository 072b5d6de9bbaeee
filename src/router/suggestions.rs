//! People-to-follow suggestions.

use axum::extract::State;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::Result;
use crate::feed::FeedAssembler;
use crate::user::User;

pub async fn handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<User>>> {
    let suggested = FeedAssembler::new(state.db.postgres.clone())
        .suggestions(&user.id, &state.config.suggestions)
        .await?;

    Ok(Json(suggested))
}
