use std::io;
use std::path::PathBuf;

use clap::Parser;

use pdf_unlock::batch::BatchRunner;
use pdf_unlock::config::validation::validate_config;
use pdf_unlock::config::{load_or_default, ConfigError, ServiceConfig};
use pdf_unlock::observability::logging;
use pdf_unlock::unlock::LopdfDecryptor;

#[derive(Parser)]
#[command(name = "pdf-unlock-batch")]
#[command(about = "Unlock every PDF in a directory, asking for each password", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing locked PDFs.
    #[arg(short, long)]
    input: Option<String>,

    /// Existing directory for unlocked copies.
    #[arg(short, long)]
    output: Option<String>,
}

/// Load the configuration and apply the directory overrides, validating
/// the final result.
fn resolve_config(cli: Cli) -> Result<ServiceConfig, ConfigError> {
    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(input) = cli.input {
        config.batch.input_dir = input;
    }
    if let Some(output) = cli.output {
        config.batch.output_dir = output;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(Cli::parse())?;

    logging::init_logging(&config.observability)?;

    let decryptor = LopdfDecryptor;
    let runner = BatchRunner::new(&config.batch, &decryptor);
    let jobs = runner.discover()?;
    tracing::info!(
        input_dir = %config.batch.input_dir,
        output_dir = %config.batch.output_dir,
        files = jobs.len(),
        "Starting batch run"
    );

    let stdin = io::stdin();
    let mut console_in = stdin.lock();
    let mut console_out = io::stdout();
    let summary = runner.run(&jobs, &mut console_in, &mut console_out);

    tracing::info!(
        unlocked = summary.unlocked,
        failed = summary.failed,
        skipped = summary.skipped,
        "Batch run finished"
    );
    Ok(())
}
