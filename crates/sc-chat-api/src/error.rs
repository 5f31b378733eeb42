//! Error taxonomy: upstream failures plus the API error type with Axum
//! `IntoResponse` support.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Failure talking to an upstream collaborator (catalog or LLM).
///
/// `Unavailable` covers network errors, timeouts, and non-2xx statuses.
/// `Malformed` means the upstream answered but the payload was unusable.
/// User-facing handling collapses both into "upstream failed"; the split
/// exists because intent extraction and synthesis degrade on `Malformed`
/// instead of propagating it.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    #[error("upstream returned malformed payload: {0}")]
    Malformed(String),
}

/// API error type that converts to proper HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body present but unusable (missing or empty message).
    #[error("unprocessable request: {0}")]
    Unprocessable(String),

    /// An upstream failed while serving a route that cannot degrade.
    #[error("upstream failed: {0}")]
    UpstreamFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        ApiError::UpstreamFailed(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ApiError::UpstreamFailed(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience alias.
pub type ApiResult<T> = Result<T, ApiError>;
