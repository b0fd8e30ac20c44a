//! Validation errors for planner inputs.
//!
//! Every rejection names the offending [`Parameter`] and the constraint it
//! violated, so callers can point the user at the exact field to fix.

use core::fmt;

/// The three inputs accepted by the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Per-seed germination probability.
    GerminationRate,
    /// Number of seedlings the caller wants.
    DesiredCount,
    /// Minimum acceptable probability of reaching the desired count.
    Confidence,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GerminationRate => "germination rate",
            Self::DesiredCount => "desired seedling count",
            Self::Confidence => "confidence threshold",
        };
        f.write_str(name)
    }
}

/// Errors raised when an input value is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The value is NaN or infinite.
    #[error("{parameter} must be a finite number")]
    NotFinite {
        /// The rejected parameter.
        parameter: Parameter,
    },

    /// The value lies outside the mathematical domain of the parameter.
    #[error("{parameter} = {value} violates {constraint}")]
    OutsideDomain {
        /// The rejected parameter.
        parameter: Parameter,
        /// The value that was supplied.
        value: f64,
        /// Human-readable form of the violated constraint (e.g. `0 < p <= 1`).
        constraint: &'static str,
    },

    /// The value is valid mathematically but outside a caller-imposed range.
    #[error("{parameter} = {value} is outside the accepted range [{min}, {max}]")]
    OutOfRange {
        /// The rejected parameter.
        parameter: Parameter,
        /// The value that was supplied.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
}

impl ValidationError {
    /// Return the parameter this error refers to.
    pub const fn parameter(&self) -> Parameter {
        match self {
            Self::NotFinite { parameter }
            | Self::OutsideDomain { parameter, .. }
            | Self::OutOfRange { parameter, .. } => *parameter,
        }
    }
}
