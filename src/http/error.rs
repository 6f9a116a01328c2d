//! Mapping of pipeline failures to HTTP responses.
//!
//! Every failure is answered where it is detected with a status code and a
//! plain-text message. Nothing is retried.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::unlock::DecryptionError;
use crate::upload::UploadError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request method")]
    MethodNotAllowed,

    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Wrong password and unsupported documents are indistinguishable here.
    #[error("Failed to unlock PDF: {0}")]
    Decryption(#[from] DecryptionError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Upload(UploadError::ReadFailure) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upload(_) => StatusCode::BAD_REQUEST,
            ApiError::Decryption(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Outcome label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ApiError::MethodNotAllowed => "method_not_allowed",
            ApiError::Upload(err) => err.kind(),
            ApiError::Decryption(_) => "decryption_failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
