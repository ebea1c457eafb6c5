use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use optimizer_core::{FieldIssue, ValidationError};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request data")]
    Validation(#[from] ValidationError),
    #[error("Invalid ID")]
    InvalidId,
    #[error("Optimization request not found")]
    NotFound,
    #[error("Internal server error")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldIssue>>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidId => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let errors = match self {
            ApiError::Validation(v) => Some(v.issues),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "[GATEWAY] request failed");
                None
            }
            _ => None,
        };
        (status, Json(ErrorBody { message, errors })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
