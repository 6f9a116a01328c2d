//! Request handlers.
//!
//! # Unlock pipeline
//! ```text
//! POST /unlock
//!     → UploadForm::from_multipart   (BadUpload 400 / ReadFailure 500)
//!     → UploadForm::validate         (BadUpload 400 / NotAPdf 400 / MissingPassword 400)
//!     → unlock (blocking pool)       (DecryptionFailed 500)
//!     → pdf_attachment               (200)
//! ```

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::error::ApiError;
use crate::http::request::request_id;
use crate::http::response::pdf_attachment;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::unlock::{self, DecryptionError};
use crate::upload::{UploadError, UploadForm};

pub const HEALTH_BODY: &str = "I'm healthy and sound!";

/// Liveness probe. Touches no state.
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, HEALTH_BODY)
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// `POST /unlock`: validate the upload, decrypt it and return the result.
pub async fn unlock_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let started = Instant::now();
    let request_id = request_id(&headers);

    match unlock_upload(&state, multipart).await {
        Ok(unlocked) => {
            tracing::info!(
                request_id = %request_id,
                bytes = unlocked.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "PDF unlocked"
            );
            metrics::record_unlock("success", started);
            pdf_attachment(unlocked, request_id)
        }
        Err(err) => {
            match &err {
                ApiError::Decryption(e) => {
                    tracing::error!(request_id = %request_id, error = %e, "Failed to unlock PDF");
                }
                ApiError::Upload(UploadError::ReadFailure) => {
                    tracing::error!(request_id = %request_id, "Failed to read uploaded file");
                }
                other => {
                    tracing::warn!(request_id = %request_id, reason = other.outcome(), "Upload rejected");
                }
            }
            metrics::record_unlock(err.outcome(), started);
            err.into_response()
        }
    }
}

async fn unlock_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Vec<u8>, ApiError> {
    let request = UploadForm::from_multipart(multipart).await?.validate()?;
    tracing::debug!(bytes = request.bytes().len(), "Upload accepted");

    let decryptor = Arc::clone(&state.decryptor);
    let unlocked = tokio::task::spawn_blocking(move || unlock::unlock(decryptor.as_ref(), &request))
        .await
        .map_err(|e| DecryptionError::new(format!("decryption task failed: {e}")))??;

    Ok(unlocked)
}
