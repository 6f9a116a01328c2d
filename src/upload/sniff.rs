//! Content sniffing for uploaded payloads.
//!
//! Only the `application/pdf` rule matters here: the payload must start with
//! the exact `%PDF-` signature. Leading whitespace is not skipped, so a
//! payload that merely contains the signature later on is not a PDF.

pub const PDF_MIME: &str = "application/pdf";

/// Magic bytes every PDF file starts with.
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Returns true if `bytes` sniff as `application/pdf`.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_SIGNATURE)
}
