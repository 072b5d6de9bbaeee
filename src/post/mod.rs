mod repository;

pub use repository::*;

use serde::{Deserialize, Serialize};

use crate::user::PublicProfile;

/// Post as saved on database.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub user_id: String,
    pub text: Option<String>,
    pub image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Post as rendered to clients: owner and commenter profiles pre-joined,
/// likes as the full set of user ids so optimistic UI state can reconcile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: i64,
    pub text: Option<String>,
    pub image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[sqlx(json)]
    pub owner: PublicProfile,
    #[sqlx(json)]
    pub likes: Vec<String>,
    #[sqlx(json)]
    pub comments: Vec<CommentView>,
}

/// One comment inside a [`PostView`], append-only ordering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub user: PublicProfile,
    pub text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
