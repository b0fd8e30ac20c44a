//! Output of a seed-count estimation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How the estimator arrived at a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EstimationMethod {
    /// Direct binomial tail search over the full desired count.
    Exact,

    /// Germination is certain (`p = 1`); one seed per seedling.
    Degenerate,

    /// The desired count was split into fixed-size batches plus a
    /// remainder, each searched independently.
    ///
    /// The reported confidence is the weaker of the per-part confidences.
    /// It is a heuristic, not the joint probability of every part
    /// succeeding at once.
    Chunked {
        /// Seedlings per batch.
        batch_size: u32,
        /// Number of full batches.
        batches: u32,
        /// Seedlings left over after the full batches (may be zero).
        remainder: u32,
    },
}

/// Seed count to sow and the probability it achieves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EstimationResult {
    /// Number of seeds to sow.
    pub seeds_to_sow: u32,

    /// Probability of getting at least the desired number of seedlings
    /// when sowing [`seeds_to_sow`](Self::seeds_to_sow) seeds.
    pub achieved_confidence: f64,

    /// Which path produced this result.
    pub method: EstimationMethod,
}

impl EstimationResult {
    /// Build a result from a direct search.
    pub const fn exact(seeds_to_sow: u32, achieved_confidence: f64) -> Self {
        Self {
            seeds_to_sow,
            achieved_confidence,
            method: EstimationMethod::Exact,
        }
    }

    /// Build the result for certain germination: one seed per seedling.
    pub const fn certain(seedlings: u32) -> Self {
        Self {
            seeds_to_sow: seedlings,
            achieved_confidence: 1.0,
            method: EstimationMethod::Degenerate,
        }
    }

    /// Whether the confidence is an approximation rather than an exact
    /// binomial tail probability.
    pub const fn is_approximate(&self) -> bool {
        matches!(self.method, EstimationMethod::Chunked { .. })
    }
}
