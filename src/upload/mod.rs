//! Upload validation subsystem.
//!
//! # Data Flow
//! ```text
//! multipart body
//!     → validator.rs (buffer `file` and `password` fields)
//!     → sniff.rs (PDF signature check)
//!     → UploadRequest (validated, request-scoped)
//! ```

pub mod sniff;
pub mod validator;

pub use validator::{UploadError, UploadForm, UploadRequest};
