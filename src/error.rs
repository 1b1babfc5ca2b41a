use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use crate::db::StoreError;
use crate::models::ErrorResponse;

pub const VIDEO_ID_REQUIRED: &str = "video_id is required";
pub const UPLOAD_FIELD_HINT: &str = "Please upload file with 'upload' form field key.";
pub const UPLOAD_UNAVAILABLE: &str = "File upload is having issues right now. Please try later.";

/// Errors a handler can answer with. Every variant is a client error
/// (400) carrying a JSON body with at least an `error` key.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("video_id is required")]
    MissingVideoId,

    #[error("{0}")]
    MissingUpload(String),

    #[error("{0}")]
    Storage(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Store(StoreError::NotFound(_)) | AppError::BadRequest(_) => None,
            AppError::Store(e) => {
                error!("Store error: {}", e);
                None
            }
            AppError::MissingVideoId => Some(VIDEO_ID_REQUIRED),
            AppError::MissingUpload(_) => Some(UPLOAD_FIELD_HINT),
            AppError::Storage(e) => {
                error!("Failed to write upload: {}", e);
                Some(UPLOAD_UNAVAILABLE)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            message: message.map(str::to_string),
        };

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
