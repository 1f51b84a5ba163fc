use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::registry::RegistryError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `INVALID_IDENTIFIER`, `NOT_FOUND`, `EXPIRED`, `STORAGE_UNAVAILABLE`,
    /// `UPLOAD_FAILED`, `INTERNAL_ERROR`.
    #[schema(example = "EXPIRED")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "File link has expired")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    InvalidIdentifier,
    NotFound(String),
    Expired,
    StorageUnavailable(String),
    UploadFailed(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::InvalidIdentifier => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "INVALID_IDENTIFIER",
                    message: "Malformed file identifier".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Expired => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "EXPIRED",
                    message: "File link has expired".into(),
                },
            ),
            AppError::StorageUnavailable(detail) => {
                tracing::error!("Storage unavailable: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "STORAGE_UNAVAILABLE",
                        message: "File storage is currently unavailable".into(),
                    },
                )
            }
            AppError::UploadFailed(detail) => {
                tracing::error!("Upload failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "UPLOAD_FAILED",
                        message: "File upload could not be completed".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidIdentifier => AppError::InvalidIdentifier,
            RegistryError::NotFound => AppError::NotFound("File not found".into()),
            RegistryError::Expired => AppError::Expired,
            RegistryError::StorageUnavailable(detail) => AppError::StorageUnavailable(detail),
            RegistryError::UploadFailed(detail) => AppError::UploadFailed(detail),
        }
    }
}
