//! Configuration System
//!
//! Layered configuration: built-in defaults, the global config file, an
//! explicit config file, then `TREEHASH_*` environment variables. CLI flags
//! are applied on top by the caller.

use crate::error::{ApiError, BuildError};
use crate::logging::LoggingConfig;
use crate::tree::builder::checked_workers;
use crate::tree::hasher::DigestAlgorithm;
use crate::tree::render::RenderMode;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreehashConfig {
    /// Scan and hashing settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scan and hashing settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Number of hashing workers (default: number of CPUs)
    #[serde(default)]
    pub workers: Option<i64>,

    /// Digest algorithm for files and aggregates
    #[serde(default)]
    pub algorithm: DigestAlgorithm,
}

impl ScanConfig {
    /// Resolve the worker count, rejecting values below 1.
    pub fn worker_count(&self) -> Result<i64, BuildError> {
        match self.workers {
            None => Ok(num_cpus::get() as i64),
            Some(n) => checked_workers(n).map(|_| n),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Rendered view: flat or tree
    #[serde(default)]
    pub format: RenderMode,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Scan(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Scan(msg) => write!(f, "Scan: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl TreehashConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.scan.worker_count() {
            errors.push(ValidationError::Scan(e.to_string()));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            errors.push(ValidationError::Logging(format!(
                "invalid format '{}'",
                self.logging.format
            )));
        }
        match self.logging.output.as_str() {
            "stderr" | "stdout" => {}
            "file" if self.logging.file.is_some() => {}
            "file" => errors.push(ValidationError::Logging(
                "output 'file' requires a log file path".to_string(),
            )),
            other => errors.push(ValidationError::Logging(format!(
                "invalid output '{}'",
                other
            ))),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all problems into one error.
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            ApiError::ConfigError(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })
    }
}
