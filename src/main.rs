//! PDF unlock service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ request id ─▶ trace ─▶ cors ──┬─ OPTIONS ─▶ 200 (empty)
//!                                                  │
//!                                                  ▼
//!                                               routing
//!                                     ┌────────────┴────────────┐
//!                                     ▼                         ▼
//!                              POST /unlock               GET /health
//!                                     │
//!                         upload validation (multipart, sniff, password)
//!                                     │
//!                         decryption (blocking pool, lopdf)
//!                                     │
//!     Client Response                 ▼
//!     ◀──────────────── application/pdf attachment | text/plain error
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use pdf_unlock::config::validation::validate_config;
use pdf_unlock::config::{load_or_default, ConfigError, ServiceConfig};
use pdf_unlock::lifecycle::{signals, Shutdown};
use pdf_unlock::observability::{logging, metrics};
use pdf_unlock::HttpServer;

#[derive(Parser)]
#[command(name = "pdf-unlock")]
#[command(about = "HTTP service that removes the password from PDF documents", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

/// Load the configuration and apply the bind override, validating the
/// final result.
fn resolve_config(cli: Cli) -> Result<ServiceConfig, ConfigError> {
    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(Cli::parse())?;

    logging::init_logging(&config.observability)?;

    tracing::info!("pdf-unlock v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        production_domain = %config.cors.production_domain,
        max_upload_bytes = config.limits.max_upload_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::trigger_on_signal(&shutdown).await;
    });

    HttpServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_override_applied() {
        let cli = Cli::parse_from(["pdf-unlock", "--bind", "127.0.0.1:9000"]);
        let config = resolve_config(cli).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_bind_override_rejected() {
        let cli = Cli::parse_from(["pdf-unlock", "--bind", "nonsense"]);
        let err = resolve_config(cli).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("listener.bind_address"));
    }
}
