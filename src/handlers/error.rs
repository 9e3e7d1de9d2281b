use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::{ErrorBody, FieldIssue};
use crate::store::StoreError;

/// Every way a request can fail, with its HTTP mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more record fields out of range or outside the enumeration.
    #[error("validation failed")]
    Validation(Vec<FieldIssue>),

    /// Unknown patient id.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate patient id on create.
    #[error("{0}")]
    Conflict(String),

    /// Bad sort parameters.
    #[error("{0}")]
    InvalidArgument(String),

    /// The backing file could not be read or written.
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ApiError::InvalidArgument(message.into())
    }
}

impl From<Vec<FieldIssue>> for ApiError {
    fn from(issues: Vec<FieldIssue>) -> Self {
        ApiError::Validation(issues)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(issues) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody::validation(issues),
            ),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, ErrorBody::message(message)),
            ApiError::Conflict(message) => (StatusCode::BAD_REQUEST, ErrorBody::message(message)),
            ApiError::InvalidArgument(message) => {
                (StatusCode::BAD_REQUEST, ErrorBody::message(message))
            }
            ApiError::Storage(err) => {
                tracing::error!("✗ Storage failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::message(format!("Storage failure: {}", err)),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
