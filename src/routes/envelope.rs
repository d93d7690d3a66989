use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::console_client::ConsoleError;
use crate::services::submission::SubmissionError;
use crate::services::transcoder::ValidationError;

/// Success envelope: `{ "success": true, ...body }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

pub fn ok<T: Serialize>(body: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        body,
    })
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

/// Errors surfaced by route handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Unprocessable {
        message: String,
        field: Option<String>,
    },

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Upstream(#[from] ConsoleError),
}

impl ApiError {
    pub fn unprocessable(message: impl Into<String>, field: &str) -> Self {
        ApiError::Unprocessable {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::Unprocessable {
            field: error.field().map(str::to_string),
            message: error.to_string(),
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(error: SubmissionError) -> Self {
        match error {
            SubmissionError::InvalidName(message) => ApiError::unprocessable(message, "name"),
            SubmissionError::Validation(e) => e.into(),
            e @ SubmissionError::NotBuildable(_) => ApiError::Conflict(e.to_string()),
            SubmissionError::Upstream(e) => ApiError::Upstream(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, field) = match &self {
            ApiError::Unprocessable { field, .. } => (StatusCode::UNPROCESSABLE_ENTITY, field.clone()),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, None),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, None),
        };
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
            field,
        };
        (status, Json(body)).into_response()
    }
}
