//! PDF unlock service library.
//!
//! Removes the user-password protection from uploaded PDF documents, either
//! over HTTP (`POST /unlock`) or interactively over a local directory.

pub mod batch;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod unlock;
pub mod upload;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
