//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, origins and the production domain
//! - Reject batch settings that would overwrite the input
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let domain = &config.cors.production_domain;
    if domain.is_empty() {
        errors.push(ValidationError::new("cors.production_domain", "must not be empty"));
    } else if domain.contains("://") || domain.contains('/') {
        errors.push(ValidationError::new(
            "cors.production_domain",
            format!("'{domain}' must be a bare domain without scheme or path"),
        ));
    }

    for origin in &config.cors.local_origins {
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            errors.push(ValidationError::new(
                "cors.local_origins",
                format!("'{origin}' must start with http:// or https://"),
            ));
        }
    }

    if config.limits.max_upload_bytes == 0 {
        errors.push(ValidationError::new("limits.max_upload_bytes", "must be greater than zero"));
    }

    if config.batch.extension.is_empty() {
        errors.push(ValidationError::new("batch.extension", "must not be empty"));
    }
    if config.batch.output_suffix.is_empty() {
        errors.push(ValidationError::new("batch.output_suffix", "must not be empty"));
    }
    if config.batch.input_dir == config.batch.output_dir {
        errors.push(ValidationError::new(
            "batch.output_dir",
            "must differ from batch.input_dir",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
