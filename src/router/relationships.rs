//! Follow/unfollow toggle.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::Result;
use crate::graph::GraphService;
use crate::user::User;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// New relationship state for the caller to render.
    pub following: bool,
}

pub async fn handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(target_id): Path<String>,
) -> Result<Json<Response>> {
    let following = GraphService::new(state.db.postgres.clone())
        .toggle_follow(&user.id, &target_id)
        .await?;

    Ok(Json(Response { following }))
}
