use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::VoteError;
use thiserror::Error;
use tracing::{error, warn};

use crate::metrics;

/// JSON error body: `{"error", "message", "code"}`
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: Option<String>,
    pub code: Option<u16>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message, code: None }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(message.into()))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(message.into()))
    }
}

impl From<VoteError> for JsonApiError {
    fn from(e: VoteError) -> Self {
        let (status, label) = match &e {
            VoteError::PermissionDenied(_) => {
                metrics::VOTE_REQUESTS_DENIED_TOTAL.inc();
                warn!(error = %e, "vote request denied");
                (StatusCode::FORBIDDEN, "Forbidden")
            }
            VoteError::InvalidVoteValue(_) | VoteError::InvalidResource(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            VoteError::Storage(_) => {
                metrics::VOTE_STORAGE_ERRORS_TOTAL.inc();
                error!(error = %e, "vote storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };
        Self { status, error: label, message: Some(e.to_string()), code: Some(e.code()) }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.error,
            "message": self.message,
            "code": self.code,
        });
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("schema check failed: {0}")]
    Schema(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::votes::Permission;

    #[test]
    fn maps_vote_errors_to_status() {
        let cases = [
            (VoteError::PermissionDenied(Permission::VoteModify), StatusCode::FORBIDDEN),
            (VoteError::InvalidVoteValue(4), StatusCode::BAD_REQUEST),
            (VoteError::InvalidResource("/".into()), StatusCode::BAD_REQUEST),
            (VoteError::Storage("gone".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            let code = err.code();
            let api: JsonApiError = err.into();
            assert_eq!(api.status, status);
            assert_eq!(api.code, Some(code));
        }
    }
}
