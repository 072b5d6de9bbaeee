//! Post listings.

use axum::extract::{Path, State};
use axum::Json;

use crate::AppState;
use crate::error::Result;
use crate::post::{PostRepository, PostView, Scope};
use crate::user::UserRepository;

/// Every post on the instance, newest first.
pub async fn all(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostView>>> {
    let posts = PostRepository::new(state.db.postgres.clone())
        .all_views()
        .await?;

    Ok(Json(posts))
}

/// One user's posts, newest first.
pub async fn by_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<PostView>>> {
    let user = UserRepository::new(state.db.postgres.clone())
        .find_by_username(&username)
        .await?;

    let posts = PostRepository::new(state.db.postgres.clone())
        .views(Scope::Owner, &user.id)
        .await?;

    Ok(Json(posts))
}
