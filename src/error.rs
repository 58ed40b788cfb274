use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::contact::{ListError, SubmitError};
use crate::validate::ValidationErrors;

/// Every failure an HTTP handler can report. Server-side details are logged
/// where they happen and never rendered into the response body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid JSON body")]
    InvalidJson,

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("server error")]
    Internal,
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(v) => ApiError::Validation(v),
            SubmitError::Store(_) => ApiError::Internal,
        }
    }
}

impl From<ListError> for ApiError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::Unauthorized => ApiError::Unauthorized,
            ListError::Store(_) => ApiError::Internal,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidJson => (
                StatusCode::BAD_REQUEST,
                json!({ "ok": false, "error": "Invalid JSON body" }),
            ),
            ApiError::Validation(errors) => {
                let error = if errors.missing_required() {
                    "Name and email required."
                } else {
                    "VALIDATION_ERROR"
                };
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "ok": false, "error": error, "details": errors.violations }),
                )
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "ok": false, "error": "UNAUTHORIZED" }),
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "ok": false, "error": "NOT_FOUND" }),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "ok": false, "error": "Server error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
