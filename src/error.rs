//! Error handler for flock.

use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sqlx::Error as SQLxError;
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Axum(#[from] JsonRejection),

    /// Referenced user or post does not exist.
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// Caller targeted their own account with a graph mutation.
    #[error("you cannot follow or unfollow yourself")]
    SelfAction,

    /// The membership test and the edge write disagreed, most likely a
    /// concurrent toggle on the same edge. Nothing was committed.
    #[error("engagement state changed concurrently, nothing was applied")]
    PartialEngagement,

    /// Caller is authenticated but does not own the resource.
    #[error("you are not allowed to alter this resource")]
    Forbidden,

    #[error("invalid 'Authorization' header")]
    Unauthorized,

    /// Underlying store failed; details stay on the server.
    #[error("SQL request failed: {0}")]
    Sql(#[from] SQLxError),

    #[error("internal server error, {details}")]
    Internal { details: String },
}

/// Structure for detailed error responses.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    r#type: Option<String>,
    title: String,
    status: u16,
    detail: String,
    instance: Option<String>,
    errors: Option<Vec<FieldError>>,
}

impl ResponseError {
    /// Update error status code.
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code.as_u16();
        self
    }

    /// Set the stable machine-readable error kind.
    pub fn kind(mut self, kind: &str) -> Self {
        self.r#type = Some(kind.into());
        self
    }

    /// Update `title` field.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.into();
        self
    }

    /// Add detailed error.
    pub fn details(mut self, description: &str) -> Self {
        self.detail = description.into();
        self
    }

    /// Automatically add errors field.
    pub fn errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = Some(parse_validation_errors(errors));
        self
    }

    /// Transform [`ResponseError`] into axum [`Response`].
    pub fn into_response(
        self,
    ) -> std::result::Result<Response, axum::http::Error> {
        if let Ok(body) = serde_json::to_string(&self) {
            Response::builder()
                .status(self.status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
        } else {
            Ok(internal_server_error())
        }
    }
}

impl Default for ResponseError {
    fn default() -> Self {
        Self {
            r#type: None,
            title: "Internal server error.".to_owned(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: String::default(),
            instance: None,
            errors: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

fn parse_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| FieldError {
                field: field.to_string(),
                message: issue.to_string(),
            })
        })
        .collect()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let response = ResponseError::default()
            .title("There were errors with your request.")
            .details(&self.to_string())
            .status(StatusCode::BAD_REQUEST);

        let response = match &self {
            ServerError::Validation(validation_errors) => response
                .kind("validation")
                .title("There were validation errors with your request.")
                .errors(validation_errors),

            ServerError::Axum(err) => response
                .kind("validation")
                .title("Server error during data parsing.")
                .details(&err.to_string()),

            ServerError::NotFound { resource } => response
                .kind("not_found")
                .title("Resource not found.")
                .details(&format!("The requested {resource} does not exist."))
                .status(StatusCode::NOT_FOUND),

            ServerError::SelfAction => response
                .kind("self_action")
                .title("You cannot target your own account."),

            ServerError::PartialEngagement => response
                .kind("partial_engagement")
                .title("Engagement state changed, retry the request.")
                .status(StatusCode::CONFLICT),

            ServerError::Forbidden => response
                .kind("forbidden")
                .title("You do not own this resource.")
                .status(StatusCode::FORBIDDEN),

            ServerError::Unauthorized => response
                .kind("unauthorized")
                .title("Missing or invalid 'Authorization' header.")
                .status(StatusCode::UNAUTHORIZED),

            // Missing rows surface as domain errors before reaching here;
            // anything else from the store stays server-side.
            ServerError::Sql(err) => {
                tracing::error!(error = %err, "store request failed");

                ResponseError::default().kind("store_unavailable")
            },

            ServerError::Internal { details } => {
                tracing::error!(%details, "server returned 500 status");

                ResponseError::default()
            },
        };

        response
            .into_response()
            .unwrap_or_else(|_| internal_server_error())
    }
}

fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(
            serde_json::json!({
                "type": null,
                "title": "Internal server error.",
                "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                "detail": null,
                "instance": null,
                "errors": null,
            })
            .to_string()
            .into(),
        )
        .unwrap_or_else(|_| Response::new("Internal server error".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                ServerError::NotFound { resource: "user" },
                StatusCode::NOT_FOUND,
            ),
            (ServerError::SelfAction, StatusCode::BAD_REQUEST),
            (ServerError::PartialEngagement, StatusCode::CONFLICT),
            (ServerError::Forbidden, StatusCode::FORBIDDEN),
            (ServerError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ServerError::Sql(SQLxError::PoolClosed), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_store_errors_leak_no_detail() {
        let response =
            ServerError::Sql(SQLxError::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
