//! Interactive batch unlocking of a local directory.
//!
//! # Responsibilities
//! - Enumerate the input directory once and build the job list
//! - Prompt for one password per job, strictly in order
//! - Unlock each file and write the result to the output directory
//!
//! # Design Decisions
//! - Single-threaded: prompts and jobs never overlap
//! - Only failing to list the input directory is fatal; every per-file
//!   failure is reported and the run moves on
//! - The output directory must already exist; existing files are replaced

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::BatchConfig;
use crate::observability::metrics;
use crate::unlock::{DecryptionError, Decryptor};
use crate::upload::sniff;

/// Fatal batch error.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to read input directory {path}: {source}")]
    ReadInputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure of a single job. Never aborts the run.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("failed to read password: {0}")]
    Prompt(#[source] io::Error),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("failed to read input file: {0}")]
    ReadInput(#[source] io::Error),

    #[error("file is not a PDF")]
    NotAPdf,

    #[error(transparent)]
    Decryption(#[from] DecryptionError),

    #[error("failed to write output file: {0}")]
    WriteOutput(#[source] io::Error),
}

/// One file to unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub file_name: String,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub unlocked: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Sequential batch runner.
pub struct BatchRunner<'a> {
    config: &'a BatchConfig,
    decryptor: &'a dyn Decryptor,
}

impl<'a> BatchRunner<'a> {
    pub fn new(config: &'a BatchConfig, decryptor: &'a dyn Decryptor) -> Self {
        Self { config, decryptor }
    }

    /// List the matching files of the input directory, sorted by name.
    ///
    /// Directories and files without the configured extension are skipped
    /// silently.
    pub fn discover(&self) -> Result<Vec<BatchJob>, BatchError> {
        let input_dir = Path::new(&self.config.input_dir);
        let entries = fs::read_dir(input_dir).map_err(|source| BatchError::ReadInputDir {
            path: input_dir.to_path_buf(),
            source,
        })?;

        let suffix = format!(".{}", self.config.extension);
        let mut jobs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| BatchError::ReadInputDir {
                path: input_dir.to_path_buf(),
                source,
            })?;
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            let Some(stem) = file_name.strip_suffix(&suffix) else {
                continue;
            };

            let destination = format!("{stem}{}{suffix}", self.config.output_suffix);
            jobs.push(BatchJob {
                source_path: entry.path(),
                destination_path: Path::new(&self.config.output_dir).join(destination),
                file_name,
            });
        }

        jobs.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(jobs)
    }

    /// Process `jobs` in order, prompting on `console_out` and reading
    /// passwords from `console_in`.
    pub fn run<R, W>(&self, jobs: &[BatchJob], console_in: &mut R, console_out: &mut W) -> BatchSummary
    where
        R: BufRead,
        W: Write,
    {
        let mut summary = BatchSummary::default();

        for job in jobs {
            let _ = write!(console_out, "Enter password for {}: ", job.file_name);
            let _ = console_out.flush();

            let password = match read_password(console_in) {
                Ok(password) => password,
                Err(e) => {
                    tracing::warn!(file = %job.file_name, error = %e, "Skipping file");
                    let _ = writeln!(console_out, "Failed to read password for {}: {}", job.file_name, e);
                    metrics::record_batch_file("skipped");
                    summary.skipped += 1;
                    continue;
                }
            };

            match self.unlock_file(job, &password) {
                Ok(bytes) => {
                    tracing::info!(
                        file = %job.file_name,
                        output = %job.destination_path.display(),
                        bytes,
                        "PDF unlocked"
                    );
                    let _ = writeln!(console_out, "Successfully unlocked {}", job.file_name);
                    metrics::record_batch_file("unlocked");
                    summary.unlocked += 1;
                }
                Err(e) => {
                    tracing::error!(file = %job.file_name, error = %e, "Failed to unlock PDF");
                    let _ = writeln!(console_out, "Failed to unlock {}: {}", job.file_name, e);
                    metrics::record_batch_file("failed");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    fn unlock_file(&self, job: &BatchJob, password: &str) -> Result<usize, JobError> {
        let locked = fs::read(&job.source_path).map_err(JobError::ReadInput)?;
        if !sniff::is_pdf(&locked) {
            return Err(JobError::NotAPdf);
        }

        let unlocked = self.decryptor.decrypt(&locked, password)?;
        fs::write(&job.destination_path, &unlocked).map_err(JobError::WriteOutput)?;
        Ok(unlocked.len())
    }
}

/// Read one newline-terminated reply and trim it.
fn read_password<R: BufRead>(console_in: &mut R) -> Result<String, JobError> {
    let mut line = String::new();
    match console_in.read_line(&mut line) {
        Ok(_) if line.ends_with('\n') => Ok(line.trim().to_string()),
        Ok(_) => Err(JobError::UnexpectedEof),
        Err(e) => Err(JobError::Prompt(e)),
    }
}
