//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the route table
//! - Wire up middleware (request ID, tracing, CORS, body limit)
//! - Bind server to listener and shut down gracefully
//!
//! # Route table
//! | path      | method | handler              |
//! |-----------|--------|----------------------|
//! | `/unlock` | POST   | `unlock_document`    |
//! | `/health` | GET    | `health`             |
//! | any       | other  | 405 / 404            |
//! | any       | OPTIONS| answered by CORS     |

use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::http::handlers::{health, method_not_allowed, not_found, unlock_document};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, X_REQUEST_ID};
use crate::lifecycle::shutdown;
use crate::security::cors::cors_middleware;
use crate::security::OriginPolicy;
use crate::unlock::{Decryptor, LopdfDecryptor};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub decryptor: Arc<dyn Decryptor>,
}

/// HTTP server for the unlock service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server backed by the `lopdf` engine.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_decryptor(config, Arc::new(LopdfDecryptor))
    }

    /// Create a server with a specific decryption engine.
    pub fn with_decryptor(config: ServiceConfig, decryptor: Arc<dyn Decryptor>) -> Self {
        let state = AppState { decryptor };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let policy = Arc::new(OriginPolicy::from_config(&config.cors));

        Router::new()
            .route("/unlock", post(unlock_document).fallback(method_not_allowed))
            .route("/health", get(health).fallback(method_not_allowed))
            .fallback(not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_upload_bytes))
            .layer(middleware::from_fn_with_state(policy, cors_middleware))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("");
                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_upload_bytes = self.config.limits.max_upload_bytes,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A clone of the configured router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
