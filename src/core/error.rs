use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::context;
use thiserror::Error;

use crate::shared::constants::{
    MSG_EMPTY_FILENAME, MSG_FILE_TOO_LARGE, MSG_GEOCODING_FAILED, MSG_INVALID_FORMAT,
    MSG_NOT_FOUND, MSG_NO_FILE, MSG_NO_GPS, MSG_SAVE_FAILED, MSG_SERVER_ERROR,
};
use crate::shared::templates::{render_template, TemplateError};

/// Why an upload was turned away before it touched the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRejection {
    MissingFile,
    EmptyFilename,
    UnsupportedFormat,
    /// Request body exceeded the configured limit
    TooLarge,
}

impl UploadRejection {
    pub fn message(self) -> &'static str {
        match self {
            UploadRejection::MissingFile => MSG_NO_FILE,
            UploadRejection::EmptyFilename => MSG_EMPTY_FILENAME,
            UploadRejection::UnsupportedFormat => MSG_INVALID_FORMAT,
            UploadRejection::TooLarge => MSG_FILE_TOO_LARGE,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid upload: {0:?}")]
    InvalidUpload(UploadRejection),

    #[error("Failed to save upload: {0}")]
    SaveFailed(#[source] std::io::Error),

    #[error("No GPS location in image")]
    NoLocation,

    #[error("Geocoding failed: {0}")]
    Geocoding(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code and user-facing message for this error.
    ///
    /// Outcomes of a form submission re-render the form with 200; only
    /// routing faults, server faults and oversized bodies carry an error status.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidUpload(UploadRejection::TooLarge) => {
                (StatusCode::PAYLOAD_TOO_LARGE, MSG_FILE_TOO_LARGE)
            }
            AppError::InvalidUpload(reason) => (StatusCode::OK, reason.message()),
            AppError::SaveFailed(_) => (StatusCode::OK, MSG_SAVE_FAILED),
            AppError::NoLocation => (StatusCode::OK, MSG_NO_GPS),
            AppError::Geocoding(_) => (StatusCode::OK, MSG_GEOCODING_FAILED),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, MSG_NOT_FOUND),
            AppError::Template(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_SERVER_ERROR)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::SaveFailed(e) => tracing::error!("Failed to save upload: {:?}", e),
            AppError::Geocoding(msg) => tracing::error!("Geocoding error: {}", msg),
            AppError::Template(e) => tracing::error!("Template error: {}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            AppError::InvalidUpload(_) | AppError::NoLocation | AppError::NotFound(_) => {
                tracing::debug!("Request rejected: {}", self)
            }
        }

        let (status, message) = self.status_and_message();
        error_page(status, message)
    }
}

/// Render the upload form annotated with `message`
pub fn error_page(status: StatusCode, message: &str) -> Response {
    match render_template("index.html", context! { error => message }) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            (status, message.to_string()).into_response()
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
