//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → handed to the HTTP server or batch runner at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    BatchConfig, CorsConfig, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    ServiceConfig,
};
pub use validation::ValidationError;
