//! Error types for seed-count estimation.
//!
//! [`EstimateError`] separates rejected input from computations that ran
//! out of budget and from internal defects. [`EstimateError::kind`] gives
//! callers a coarse [`ErrorKind`] to branch on before reporting.

use germination_types::ValidationError;

/// Errors that can occur while estimating a seed count.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimateError {
    /// An input was outside its domain. Nothing was computed.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The search exhausted its iteration or wall-clock budget.
    ///
    /// Retrying with a smaller seedling count or a lower confidence
    /// threshold shortens the search.
    #[error(
        "computation too expensive: gave up after {iterations} evaluations \
         ({elapsed_ms} ms) at {last_trials} seeds"
    )]
    ComputationTimeout {
        /// Probability evaluations performed before giving up.
        iterations: u64,
        /// The last seed count that was evaluated.
        last_trials: u32,
        /// Wall-clock time spent, in milliseconds.
        elapsed_ms: u64,
    },

    /// The seed count needed exceeds the representable range.
    #[error("seed count overflow: required seeds exceed {}", u32::MAX)]
    SeedCountOverflow,

    /// The probability computation produced a non-finite value.
    #[error("numerical failure: {reason}")]
    Numerical {
        /// Description of what went wrong.
        reason: String,
    },
}

/// Coarse classification of an [`EstimateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller supplied bad input.
    InvalidInput,
    /// The computation was cut off by its budget.
    Timeout,
    /// A defect or a limit of the numeric representation.
    Internal,
}

impl EstimateError {
    /// Classify this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::ComputationTimeout { .. } => ErrorKind::Timeout,
            Self::SeedCountOverflow | Self::Numerical { .. } => ErrorKind::Internal,
        }
    }

    /// Whether retrying with relaxed parameters may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ComputationTimeout { .. })
    }
}
