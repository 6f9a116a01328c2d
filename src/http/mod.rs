//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → security::cors (pre-flight, CORS headers)
//!     → handlers.rs (unlock pipeline, health)
//!     → response.rs / error.rs (PDF attachment or plain-text error)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
