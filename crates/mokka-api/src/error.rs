//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mokka_hardware::HardwareError;
use mokka_storage::StorageError;
use serde::Serialize;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps domain and hardware failures to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    Hardware(HardwareError),
    Storage(StorageError),
    Domain(mokka_core::Error),
}

impl From<HardwareError> for ApiError {
    fn from(err: HardwareError) -> Self {
        Self::Hardware(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<mokka_core::Error> for ApiError {
    fn from(err: mokka_core::Error) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Hardware(err) if err.is_validation() => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Hardware(err) if err.is_busy() => (StatusCode::CONFLICT, err.to_string()),
            Self::Domain(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Hardware(err) => {
                tracing::error!(error = %err, "hardware error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            Self::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
