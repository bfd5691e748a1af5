//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, ErrorKind};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

/// Returns the HTTP status reported for a domain error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InputInvalid => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Duplicate => StatusCode::CONFLICT,
        ErrorKind::ConstraintsViolation => StatusCode::PRECONDITION_FAILED,
        // a conflict only leaks out when retries are bypassed
        ErrorKind::ConcurrencyConflict | ErrorKind::MaxRetriesExceeded => StatusCode::CONFLICT,
        ErrorKind::MarshalingFailed | ErrorKind::UnmarshalingFailed | ErrorKind::Technical => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!(error = %message, %kind, "internal server error");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}
