//! Cross-origin middleware.
//!
//! Wraps the whole routing table:
//! - Access-control headers are attached only for allowed origins, echoing
//!   the caller's origin verbatim and permitting credentials.
//! - `OPTIONS` is answered `200` with an empty body and never reaches a
//!   handler, whether or not the origin is allowed.
//! - A denied origin is not an error; the request is still served.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::security::origin::OriginPolicy;

pub const ALLOW_METHODS: &str = "POST, GET, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

pub async fn cors_middleware(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // A missing or non-UTF-8 header is evaluated as the empty string.
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let allowed = policy.is_allowed(&origin);
    if !allowed && !origin.is_empty() {
        tracing::debug!(origin = %origin, "Origin not allowed; omitting CORS headers");
    }

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    if allowed {
        insert_cors_headers(response.headers_mut(), &origin);
    }
    response
}

fn insert_cors_headers(headers: &mut HeaderMap, origin: &str) {
    // `origin` came from a valid header value, so this cannot fail.
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}
