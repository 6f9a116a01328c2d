//! Upload extraction and validation.
//!
//! # Responsibilities
//! - Drain the multipart body into an [`UploadForm`] (fully buffered)
//! - Check the file field, its PDF signature, then the password
//!
//! # Design Decisions
//! - Fields may arrive in any order; the first `file` and `password` win
//! - The whole upload is held in memory before decryption starts
//! - The password is checked trimmed but passed on untouched

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartRejection};
use thiserror::Error;

use crate::upload::sniff;

pub const FILE_FIELD: &str = "file";
pub const PASSWORD_FIELD: &str = "password";

/// Ways an upload can be rejected before decryption.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UploadError {
    /// The file field is missing or the form could not be parsed.
    #[error("Failed to read file from form")]
    BadUpload,

    /// Buffering the file content failed.
    #[error("Failed to read file content")]
    ReadFailure,

    /// The payload does not start with the PDF signature.
    #[error("Uploaded file is not a PDF")]
    NotAPdf,

    /// The password field is absent or blank.
    #[error("Password not provided")]
    MissingPassword,
}

impl UploadError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UploadError::BadUpload => "bad_upload",
            UploadError::ReadFailure => "read_failure",
            UploadError::NotAPdf => "not_a_pdf",
            UploadError::MissingPassword => "missing_password",
        }
    }
}

/// Raw form fields as received, before any validation.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<Bytes>,
    pub password: Option<String>,
}

impl UploadForm {
    /// Buffer the relevant fields of a multipart body.
    ///
    /// A form that cannot be parsed at all is a [`UploadError::BadUpload`];
    /// a failure while reading the file content is a
    /// [`UploadError::ReadFailure`].
    pub async fn from_multipart(
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Self, UploadError> {
        let mut multipart = multipart.map_err(|rejection| {
            tracing::debug!(error = %rejection, "Request is not a multipart form");
            UploadError::BadUpload
        })?;

        let mut form = UploadForm::default();
        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    // A broken stream after the file was buffered leaves the
                    // form usable; before that it is unreadable.
                    if form.file.is_some() {
                        tracing::debug!(error = %e, "Ignoring trailing multipart error");
                        break;
                    }
                    tracing::debug!(error = %e, "Malformed multipart body");
                    return Err(UploadError::BadUpload);
                }
            };

            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some(FILE_FIELD) if form.file.is_none() => {
                    let bytes = field.bytes().await.map_err(|e| {
                        tracing::warn!(error = %e, "Failed to buffer uploaded file");
                        UploadError::ReadFailure
                    })?;
                    form.file = Some(bytes);
                }
                Some(PASSWORD_FIELD) if form.password.is_none() => {
                    // An unreadable password field counts as a missing one.
                    form.password = field.text().await.ok();
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Apply the validation steps in order.
    pub fn validate(self) -> Result<UploadRequest, UploadError> {
        let file = self.file.ok_or(UploadError::BadUpload)?;

        if !sniff::is_pdf(&file) {
            return Err(UploadError::NotAPdf);
        }

        let password = self
            .password
            .filter(|password| !password.trim().is_empty())
            .ok_or(UploadError::MissingPassword)?;

        Ok(UploadRequest { bytes: file, password })
    }
}

/// A validated upload: a PDF payload plus a non-blank password.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    bytes: Bytes,
    password: String,
}

impl UploadRequest {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(file: Option<&'static [u8]>, password: Option<&str>) -> UploadForm {
        UploadForm {
            file: file.map(Bytes::from_static),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_upload() {
        let request = form(Some(b"%PDF-1.4 body"), Some("secret")).validate().unwrap();
        assert_eq!(request.bytes(), b"%PDF-1.4 body");
        assert_eq!(request.password(), "secret");
    }

    #[test]
    fn test_missing_file() {
        let err = form(None, Some("secret")).validate().unwrap_err();
        assert_eq!(err, UploadError::BadUpload);
    }

    #[test]
    fn test_not_a_pdf() {
        let err = form(Some(b"0123456789"), Some("x")).validate().unwrap_err();
        assert_eq!(err, UploadError::NotAPdf);
        assert!(err.to_string().contains("not a PDF"));
    }

    #[test]
    fn test_empty_file_is_not_a_pdf() {
        let err = form(Some(b""), Some("x")).validate().unwrap_err();
        assert_eq!(err, UploadError::NotAPdf);
    }

    #[test]
    fn test_signature_checked_before_password() {
        let err = form(Some(b"GIF89a"), None).validate().unwrap_err();
        assert_eq!(err, UploadError::NotAPdf);
    }

    #[test]
    fn test_missing_or_blank_password() {
        assert_eq!(
            form(Some(b"%PDF-1.7"), None).validate().unwrap_err(),
            UploadError::MissingPassword
        );
        assert_eq!(
            form(Some(b"%PDF-1.7"), Some("")).validate().unwrap_err(),
            UploadError::MissingPassword
        );
        assert_eq!(
            form(Some(b"%PDF-1.7"), Some(" \t\n")).validate().unwrap_err(),
            UploadError::MissingPassword
        );
    }

    #[test]
    fn test_password_not_trimmed() {
        let request = form(Some(b"%PDF-1.7"), Some(" pass ")).validate().unwrap();
        assert_eq!(request.password(), " pass ");
    }
}
