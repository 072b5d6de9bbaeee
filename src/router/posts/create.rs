use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::AppState;
use crate::error::Result;
use crate::post::{Post, PostRepository};
use crate::router::Valid;
use crate::user::User;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(length(
        min = 1,
        max = 500,
        message = "Text must be 1 to 500 characters long."
    ))]
    pub text: Option<String>,
    #[validate(url(message = "Image must be a URL."))]
    pub image: Option<String>,
}

fn empty_post() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "text",
        ValidationError::new("post")
            .with_message("Post must have text or image.".into()),
    );
    errors
}

/// Handler to create a post.
pub async fn handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Post>)> {
    if body.text.is_none() && body.image.is_none() {
        return Err(empty_post().into());
    }

    let post = PostRepository::new(state.db.postgres.clone())
        .insert(&user.id, body.text.as_deref(), body.image.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(post)))
}
