//! Error types for the `germination` binary.
//!
//! [`CliError`] wraps every failure mode of a run and maps it to a process
//! exit code, so scripts can tell bad input from an over-budget search.

use germination_core::{ConfigError, ErrorKind, EstimateError};
use germination_types::ValidationError;

/// Exit code for rejected input.
pub const EXIT_INVALID_INPUT: u8 = 2;

/// Exit code for a search that ran out of budget.
pub const EXIT_TIMEOUT: u8 = 3;

/// Exit code for everything else.
pub const EXIT_FAILURE: u8 = 1;

/// Top-level error for the `germination` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The estimator rejected the request or failed.
    #[error("{source}")]
    Estimate {
        /// The underlying estimation error.
        #[from]
        source: EstimateError,
    },

    /// An input was rejected before estimation.
    #[error("invalid input: {source}")]
    Validation {
        /// The underlying validation error.
        #[from]
        source: ValidationError,
    },

    /// Reading the query file failed.
    #[error("failed to read queries: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A query line could not be parsed.
    #[error("line {line}: {reason}")]
    Query {
        /// 1-based line number.
        line: usize,
        /// What is wrong with the line.
        reason: String,
    },

    /// Encoding JSON output failed.
    #[error("failed to encode output: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// Some queries in a batch failed; each was already reported.
    #[error("{failed} of {total} queries failed")]
    BatchFailed {
        /// Number of failed queries.
        failed: usize,
        /// Number of queries attempted.
        total: usize,
        /// Exit code of the first failure.
        exit_code: u8,
    },
}

impl CliError {
    /// Process exit code for this error.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Estimate { source } => match source.kind() {
                ErrorKind::InvalidInput => EXIT_INVALID_INPUT,
                ErrorKind::Timeout => EXIT_TIMEOUT,
                ErrorKind::Internal => EXIT_FAILURE,
            },
            Self::Validation { .. } | Self::Query { .. } => EXIT_INVALID_INPUT,
            Self::BatchFailed { exit_code, .. } => *exit_code,
            Self::Config { .. } | Self::Io { .. } | Self::Json { .. } => EXIT_FAILURE,
        }
    }
}
