use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::ingest::IngestError;
use crate::store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
///
/// The JSON shapes here are part of the preserved surface: client errors
/// are `{"message"}`, server errors are `{"message","error"}` where `error`
/// carries the diagnostic string (never a raw internal error value).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Upload request arrived without a `file` multipart field.
    #[error("No file uploaded")]
    MissingFile,

    /// Search filter matched nothing. Distinct from an empty catalog
    /// listing, which is a normal 200 with zero counts.
    #[error("No products found matching your criteria")]
    NoMatches,

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Decode or persistence failure while processing an upload.
    #[error("Error processing CSV file")]
    Ingest(#[from] IngestError),

    /// Store failure on a read path.
    #[error("Failed to fetch products")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NoMatches | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Ingest(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The diagnostic string for server errors, shown as the `error` field.
    fn detail(&self) -> Option<String> {
        match self {
            ApiError::Ingest(err) => Some(err.to_string()),
            ApiError::Store(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, detail = ?self.detail(), "request failed");
        }

        let body = match self.detail() {
            Some(detail) => Json(json!({ "message": message, "error": detail })),
            None => Json(json!({ "message": message })),
        };

        (status, body).into_response()
    }
}
