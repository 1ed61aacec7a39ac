//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tw_pages::PageError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No page at the requested path.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Search query rejected by the page cache.
    #[error("{0}")]
    InvalidQuery(String),

    /// Reload token did not match.
    #[error("invalid token")]
    InvalidToken,

    /// Reload failed.
    #[error("Reload failed: {0}")]
    Reload(#[source] PageError),

    /// Background task failed to complete.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PageError> for ServerError {
    fn from(error: PageError) -> Self {
        if error.is_invalid_query() {
            Self::InvalidQuery(error.to_string())
        } else {
            Self::Reload(error)
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::PageNotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Page not found", "path": path}),
            ),
            Self::InvalidQuery(message) => (StatusCode::BAD_REQUEST, json!({"error": message})),
            Self::InvalidToken => return (StatusCode::FORBIDDEN, "invalid token").into_response(),
            Self::Reload(e) => {
                let status = if e.download_status().is_some() {
                    StatusCode::BAD_GATEWAY
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, json!({"error": e.to_string()}))
            }
            Self::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": message}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
