//! Notification inbox.

use axum::extract::State;
use axum::{Extension, Json};

use crate::AppState;
use crate::error::Result;
use crate::notification::{NotificationRepository, NotificationView};
use crate::user::User;

/// List the caller's notifications, newest first.
///
/// Listing marks everything read; there is no separate acknowledgment step.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<NotificationView>>> {
    let notifications =
        NotificationRepository::new(state.db.postgres.clone())
            .list_and_mark_read(&user.id)
            .await?;

    Ok(Json(notifications))
}

/// Delete every notification addressed to the caller.
pub async fn clear(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<()> {
    NotificationRepository::new(state.db.postgres.clone())
        .clear(&user.id)
        .await
}
