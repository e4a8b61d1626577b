//! HTTP error envelopes
//!
//! Repositories return `placetrack_common::Error`; these wrappers decide
//! the status code and response body. Driver/database detail never reaches
//! the client body, only the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use placetrack_common::Error;
use serde_json::json;
use tracing::error;

/// Result type for handlers using the `{"error": ...}` envelope.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Result type for the SME surface, which wraps everything in
/// `{"success": ..., "message": ...}`.
pub type SmeResult<T> = std::result::Result<T, SmeError>;

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) | Error::FieldValidation(_) | Error::Conflict(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error wrapper rendering the `{"error": ...}` body used by most routes.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError(Error::Database(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = match self.0 {
            Error::Validation(msg) => json!({ "error": msg }),
            Error::FieldValidation(details) => {
                json!({ "error": "Validation failed", "details": details })
            }
            Error::NotFound(msg) => json!({ "error": msg }),
            Error::Conflict(msg) => json!({ "error": msg }),
            other => {
                error!("Request failed: {}", other);
                json!({ "error": "Internal Server Error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Error wrapper rendering the `{"success": false, "message": ...}` body
/// used by the SME routes.
#[derive(Debug)]
pub struct SmeError(pub Error);

impl From<Error> for SmeError {
    fn from(err: Error) -> Self {
        SmeError(err)
    }
}

impl From<sqlx::Error> for SmeError {
    fn from(err: sqlx::Error) -> Self {
        SmeError(Error::Database(err))
    }
}

impl IntoResponse for SmeError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let message = match self.0 {
            Error::Validation(msg) | Error::NotFound(msg) | Error::Conflict(msg) => msg,
            Error::FieldValidation(_) => "Validation failed".to_string(),
            other => {
                error!("Request failed: {}", other);
                "Internal server error".to_string()
            }
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}
