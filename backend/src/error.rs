//! Error handling for the AgriGen analysis server
//!
//! Provides consistent JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::CoreError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Upload errors
    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("Empty filename")]
    EmptyFilename,

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Payload too large")]
    PayloadTooLarge,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Image could not be decoded: {0}")]
    ImageDecode(String),

    // External service errors
    #[error("Inference service error: {0}")]
    InferenceService(String),

    #[error("Weather service error: {0}")]
    WeatherService(String),

    #[error("Hybrid catalog error: {0}")]
    Catalog(String),

    // Core errors
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::NoFileUploaded => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "NO_FILE_UPLOADED".to_string(),
                    message: "No file uploaded".to_string(),
                    field: Some("file".to_string()),
                },
            ),
            AppError::EmptyFilename => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "EMPTY_FILENAME".to_string(),
                    message: "Empty filename".to_string(),
                    field: Some("file".to_string()),
                },
            ),
            AppError::UnsupportedFileType(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "UNSUPPORTED_FILE_TYPE".to_string(),
                    message: msg.clone(),
                    field: Some("file".to_string()),
                },
            ),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorDetail {
                    code: "PAYLOAD_TOO_LARGE".to_string(),
                    message: "Uploaded file exceeds the size limit".to_string(),
                    field: Some("file".to_string()),
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ImageDecode(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "IMAGE_DECODE_ERROR".to_string(),
                    message: format!("Image could not be decoded: {}", msg),
                    field: Some("file".to_string()),
                },
            ),
            AppError::InferenceService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "INFERENCE_SERVICE_ERROR".to_string(),
                    message: format!("Inference service error: {}", msg),
                    field: None,
                },
            ),
            AppError::WeatherService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "WEATHER_SERVICE_ERROR".to_string(),
                    message: format!("Weather service error: {}", msg),
                    field: None,
                },
            ),
            AppError::Catalog(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CATALOG_ERROR".to_string(),
                    message: format!("Hybrid catalog error: {}", msg),
                    field: None,
                },
            ),
            AppError::Core(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CORE_ERROR".to_string(),
                    message: err.to_string(),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
