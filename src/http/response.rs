//! Successful unlock responses.
//!
//! # Responsibilities
//! - Attach `Content-Type: application/pdf` and the attachment disposition
//! - Stream the unlocked bytes and notice when the client goes away
//!
//! # Design Decisions
//! - The status line is committed before the body is written, so a failed
//!   write can only be logged; it is never retried
//! - Delivery is tracked by a guard that lives inside the body stream

use std::convert::Infallible;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use futures_util::stream;

use crate::upload::sniff::PDF_MIME;

pub const UNLOCKED_FILENAME: &str = "unlocked.pdf";

/// Build the `200` response carrying an unlocked document.
pub fn pdf_attachment(unlocked: Vec<u8>, request_id: String) -> Response {
    let guard = DeliveryGuard {
        request_id,
        bytes: unlocked.len(),
        delivered: false,
    };

    let body = stream::unfold(
        (Some(Bytes::from(unlocked)), guard),
        |(chunk, mut guard)| async move {
            match chunk {
                Some(bytes) => Some((Ok::<_, Infallible>(bytes), (None, guard))),
                None => {
                    guard.delivered = true;
                    None
                }
            }
        },
    );

    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(PDF_MIME));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"unlocked.pdf\""),
    );
    response
}

/// Logs when the response body is dropped before it was fully written.
struct DeliveryGuard {
    request_id: String,
    bytes: usize,
    delivered: bool,
}

impl Drop for DeliveryGuard {
    fn drop(&mut self) {
        if !self.delivered {
            tracing::warn!(
                request_id = %self.request_id,
                bytes = self.bytes,
                "Failed to write unlocked PDF to response"
            );
        }
    }
}
