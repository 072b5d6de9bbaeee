//! HTTP surface: thin controllers binding the graph, engagement, feed and
//! notification operations.

pub mod feed;
pub mod notifications;
pub mod posts;
pub mod relationships;
pub mod status;
pub mod suggestions;

use axum::extract::{FromRequest, Request, State};
use axum::http::header;
use axum::response::Response;
use axum::{Json, middleware};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::user::{User, UserRepository};
use crate::{AppState, ServerError};

const BEARER: &str = "Bearer ";

/// Custom middleware for authentification.
///
/// Resolves the bearer token through the identity store and attaches the
/// caller's [`User`] to the request. Token issuance lives elsewhere.
pub async fn auth(
    State(state): State<AppState>,
    mut req: Request,
    next: middleware::Next,
) -> Result<Response, ServerError> {
    let token = match req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
    {
        Some(token) => token.replace(BEARER, ""),
        None => return Err(ServerError::Unauthorized),
    };

    let user = UserRepository::new(state.db.postgres.clone())
        .find_by_token(&token)
        .await?;

    req.extensions_mut().insert::<User>(user);
    Ok(next.run(req).await)
}

/// Json extractor running `validator` rules before the handler.
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Valid(value))
    }
}

#[cfg(test)]
pub(crate) fn state(pool: sqlx::Pool<sqlx::Postgres>) -> AppState {
    use std::sync::Arc;

    AppState {
        config: Arc::new(crate::config::Configuration::default()),
        db: crate::database::Database { postgres: pool },
    }
}
