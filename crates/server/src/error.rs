use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to API clients. Ingestion failures are user errors (bad
/// file contents), so everything here maps to 4xx.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file part in request")]
    MissingFile,
    #[error("Invalid file type: '{0}'")]
    UnsupportedFileType(String),
    #[error("Error processing file: {0}")]
    Csv(#[from] tally_import::CsvError),
    #[error("Error processing image: {0}")]
    Receipt(#[from] tally_ocr::PipelineError),
    #[error("Invalid multipart request: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
    #[error("{0}")]
    InvalidPayload(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::BAD_REQUEST;
        tracing::warn!("request failed: {self}");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
