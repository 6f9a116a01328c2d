//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the unlock service and batch runner.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Cross-origin allow-list.
    pub cors: CorsConfig,

    /// Upload limits.
    pub limits: LimitsConfig,

    /// Batch mode directories and naming.
    pub batch: BatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Cross-origin allow-list configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed verbatim (local development servers).
    pub local_origins: Vec<String>,

    /// Production domain; `https://<domain>` and every subdomain are allowed.
    pub production_domain: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            local_origins: vec![
                "http://localhost".to_string(),
                "http://localhost:8080".to_string(),
                "http://localhost:3000".to_string(),
            ],
            production_domain: "thesoorajsingh.me".to_string(),
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted request body for `/unlock`, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Batch mode configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory scanned once at startup.
    pub input_dir: String,

    /// Directory unlocked copies are written to. Must already exist.
    pub output_dir: String,

    /// File extension (without the dot) selecting which entries to process.
    pub extension: String,

    /// Suffix appended to the file stem of each output file.
    pub output_suffix: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: "input".to_string(),
            output_dir: "output".to_string(),
            extension: "pdf".to_string(),
            output_suffix: "_unlocked".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Prometheus exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
