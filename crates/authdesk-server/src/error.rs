//! HTTP mapping for domain errors.

use authdesk_core::DeskError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

pub struct ApiError(pub DeskError);

impl From<DeskError> for ApiError {
    fn from(err: DeskError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            DeskError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            DeskError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE"),
            DeskError::InvalidPageSize { .. } => (StatusCode::BAD_REQUEST, "INVALID_PAGE_SIZE"),
            DeskError::InvalidCursor { .. } => (StatusCode::BAD_REQUEST, "INVALID_CURSOR"),
            DeskError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            DeskError::InvalidReference { .. } => (StatusCode::BAD_REQUEST, "INVALID_REFERENCE"),
            DeskError::MinimumScopeViolation { .. } => {
                (StatusCode::BAD_REQUEST, "MINIMUM_SCOPE_VIOLATION")
            }
            DeskError::Database(_) | DeskError::Sync(_) | DeskError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        let body = ErrorBody {
            code,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
