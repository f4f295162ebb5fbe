use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::services::llm_client::LlmError;

pub type AppResult<T> = Result<T, AppError>;

pub const UNSUPPORTED_FORMAT_MESSAGE: &str = "Only PDF files allowed";
pub const EXTRACTION_INSUFFICIENT_MESSAGE: &str = "Couldn't extract text from CV";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported file format: {file_name}")]
    UnsupportedFormat { file_name: String },

    #[error("Invalid PDF document: {message}")]
    DocumentFormat { message: String },

    #[error("Extracted text too short: {length} characters")]
    ExtractionInsufficient { length: usize },

    #[error("LLM backend failed: {0}")]
    Backend(#[from] LlmError),

    #[error("Request timeout")]
    Timeout,

    #[error("File too large: exceeds limit of {limit}MB")]
    FileTooLarge { limit: usize },

    #[error("Missing form field: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid multipart body: {message}")]
    InvalidMultipart { message: String },

    #[error("Rate limit exceeded: maximum concurrent requests reached")]
    RateLimitExceeded,

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            AppError::DocumentFormat { .. } => "DOCUMENT_FORMAT",
            AppError::ExtractionInsufficient { .. } => "EXTRACTION_INSUFFICIENT",
            AppError::Backend(_) => "BACKEND_ERROR",
            AppError::Timeout => "REQUEST_TIMEOUT",
            AppError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AppError::MissingField { .. } => "MISSING_FIELD",
            AppError::InvalidMultipart { .. } => "INVALID_MULTIPART",
            AppError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Validation failures are answered with 200 so the upload page can render
    /// the message like any other answer.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnsupportedFormat { .. } => StatusCode::OK,
            AppError::DocumentFormat { .. } => StatusCode::OK,
            AppError::ExtractionInsufficient { .. } => StatusCode::OK,
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::MissingField { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidMultipart { .. } => StatusCode::BAD_REQUEST,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.status_code() == StatusCode::OK
    }

    /// Text shown to the end user. Upstream and internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::UnsupportedFormat { .. } | AppError::DocumentFormat { .. } => {
                UNSUPPORTED_FORMAT_MESSAGE.to_string()
            }
            AppError::ExtractionInsufficient { .. } => EXTRACTION_INSUFFICIENT_MESSAGE.to_string(),
            AppError::Backend(_) => {
                "The analysis service is unavailable, please try again later".to_string()
            }
            AppError::Timeout => "The analysis service took too long to answer".to_string(),
            AppError::FileTooLarge { .. }
            | AppError::MissingField { .. }
            | AppError::InvalidMultipart { .. }
            | AppError::RateLimitExceeded => self.to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
        }
    }
}

/// Renders a message as the inline error fragment the upload page displays.
pub fn error_fragment(message: &str) -> String {
    format!("<b style='color:red'>{}</b>", message)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        if self.is_validation() {
            tracing::info!(
                error_code = error_code,
                error_message = %message,
                "Upload rejected"
            );
        } else {
            tracing::error!(
                error_code = error_code,
                status_code = %status,
                error_message = %message,
                "API error occurred"
            );
        }

        (status, Html(error_fragment(&self.user_message()))).into_response()
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal {
            message: format!("Background task failed: {}", err),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::InvalidMultipart {
            message: err.body_text(),
        }
    }
}

impl AppError {
    pub fn document_format(message: impl Into<String>) -> Self {
        AppError::DocumentFormat {
            message: message.into(),
        }
    }
}
