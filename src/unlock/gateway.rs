//! Decryption gateway.
//!
//! # Responsibilities
//! - Hand the document bytes and user password to the PDF engine
//! - Collapse every engine failure into a single [`DecryptionError`]
//! - Return the unprotected bytes untouched on success
//!
//! # Design Decisions
//! - Wrong password, corrupt structure and unsupported schemes are not
//!   told apart; the engine's message is passed through as-is
//! - A document that is not encrypted is refused

use lopdf::Document;
use thiserror::Error;

use crate::upload::UploadRequest;

/// Any failure reported by the decryption engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DecryptionError {
    message: String,
}

impl DecryptionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<lopdf::Error> for DecryptionError {
    fn from(err: lopdf::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// A decryption engine: `(bytes, user password) -> bytes | error`.
pub trait Decryptor: Send + Sync + std::fmt::Debug {
    fn decrypt(&self, bytes: &[u8], password: &str) -> Result<Vec<u8>, DecryptionError>;
}

/// Unlock a validated upload with the given engine.
pub fn unlock(decryptor: &dyn Decryptor, request: &UploadRequest) -> Result<Vec<u8>, DecryptionError> {
    decryptor.decrypt(request.bytes(), request.password())
}

/// [`Decryptor`] backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfDecryptor;

impl Decryptor for LopdfDecryptor {
    fn decrypt(&self, bytes: &[u8], password: &str) -> Result<Vec<u8>, DecryptionError> {
        let mut document = Document::load_mem(bytes)?;

        if !document.is_encrypted() && document.encryption_state.is_none() {
            return Err(DecryptionError::new("document is not encrypted"));
        }

        if document.is_encrypted() {
            document.decrypt(password)?;
        }
        document.encryption_state = None;

        let mut unlocked = Vec::with_capacity(bytes.len());
        document.save_to(&mut unlocked).map_err(|e| DecryptionError::new(e.to_string()))?;
        Ok(unlocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unlock::fixtures::{encrypted_pdf, first_page_text, plain_pdf, PAGE_TEXT};

    #[derive(Debug)]
    struct FixedPassword(&'static str);

    impl Decryptor for FixedPassword {
        fn decrypt(&self, bytes: &[u8], password: &str) -> Result<Vec<u8>, DecryptionError> {
            if password == self.0 {
                Ok(bytes.to_vec())
            } else {
                Err(DecryptionError::new("incorrect password"))
            }
        }
    }

    #[test]
    fn test_unencrypted_document_refused() {
        let bytes = plain_pdf();
        assert!(bytes.starts_with(b"%PDF-"));

        let err = LopdfDecryptor.decrypt(&bytes, "secret").unwrap_err();
        assert_eq!(err.message(), "document is not encrypted");
    }

    #[test]
    fn test_correct_password_unlocks() {
        let locked = encrypted_pdf("secret", "owner");
        assert!(Document::load_mem(&locked).unwrap().is_encrypted());
        assert!(!locked.windows(PAGE_TEXT.len()).any(|w| w == PAGE_TEXT.as_bytes()));

        let unlocked = LopdfDecryptor.decrypt(&locked, "secret").unwrap();
        assert!(unlocked.starts_with(b"%PDF-"));
        assert!(first_page_text(&unlocked).contains(PAGE_TEXT));
    }

    #[test]
    fn test_wrong_password_fails() {
        let locked = encrypted_pdf("secret", "owner");

        let err = LopdfDecryptor.decrypt(&locked, "guess").unwrap_err();
        assert!(!err.message().is_empty());
        assert!(LopdfDecryptor.decrypt(&locked, "").is_err());
    }

    #[test]
    fn test_empty_user_password_opens_with_anything() {
        let locked = encrypted_pdf("", "owner");

        for password in ["", "anything at all"] {
            let unlocked = LopdfDecryptor.decrypt(&locked, password).unwrap();
            assert!(unlocked.starts_with(b"%PDF-"));
            assert!(first_page_text(&unlocked).contains(PAGE_TEXT));
        }
    }

    #[test]
    fn test_garbage_after_signature_fails() {
        let err = LopdfDecryptor.decrypt(b"%PDF-1.7 this is not a document", "secret");
        assert!(err.is_err());
    }

    #[test]
    fn test_unlock_passes_request_through() {
        let request = crate::upload::UploadForm {
            file: Some(axum::body::Bytes::from_static(b"%PDF-1.4 locked")),
            password: Some("open sesame".into()),
        }
        .validate()
        .unwrap();

        let unlocked = unlock(&FixedPassword("open sesame"), &request).unwrap();
        assert_eq!(unlocked, b"%PDF-1.4 locked");

        let wrong = crate::upload::UploadForm {
            file: Some(axum::body::Bytes::from_static(b"%PDF-1.4 locked")),
            password: Some("guess".into()),
        }
        .validate()
        .unwrap();
        let err = unlock(&FixedPassword("open sesame"), &wrong).unwrap_err();
        assert_eq!(err.to_string(), "incorrect password");
    }
}
