//! Presentation of estimation results.
//!
//! The summary sentence reads
//! `To have a 96.51% chance of getting 10 seedlings, plant 23 seeds.`
//! Chunked results carry an extra note because their confidence is an
//! approximation.

use core::fmt;

use germination_types::{
    ConfidenceThreshold, DesiredCount, EstimationMethod, EstimationResult, GerminationRate,
};
use serde::Serialize;

/// A result together with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Germination rate supplied.
    pub germination_rate: GerminationRate,
    /// Seedlings wanted.
    pub desired_seedlings: DesiredCount,
    /// Confidence threshold supplied.
    pub confidence_threshold: ConfidenceThreshold,
    /// The estimate.
    #[serde(flatten)]
    pub result: EstimationResult,
    /// Whether the achieved confidence is approximate.
    pub approximate: bool,
    /// Human-readable summary sentence.
    pub summary: String,
}

impl Report {
    /// Assemble a report.
    pub fn new(
        germination_rate: GerminationRate,
        desired_seedlings: DesiredCount,
        confidence_threshold: ConfidenceThreshold,
        result: EstimationResult,
    ) -> Self {
        Self {
            germination_rate,
            desired_seedlings,
            confidence_threshold,
            result,
            approximate: result.is_approximate(),
            summary: summary(&result, desired_seedlings),
        }
    }

    /// Serialize as a single-line JSON object.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary)?;
        if let Some(note) = approximation_note(&self.result) {
            write!(f, "\n{note}")?;
        }
        Ok(())
    }
}

/// The one-line summary sentence for a result.
pub fn summary(result: &EstimationResult, seedlings: DesiredCount) -> String {
    format!(
        "To have a {}% chance of getting {} {}, plant {} {}.",
        format_percent(result.achieved_confidence),
        seedlings,
        plural(seedlings.get(), "seedling", "seedlings"),
        result.seeds_to_sow,
        plural(result.seeds_to_sow, "seed", "seeds"),
    )
}

/// Explanation attached to chunked results; `None` otherwise.
pub fn approximation_note(result: &EstimationResult) -> Option<String> {
    match result.method {
        EstimationMethod::Chunked {
            batch_size,
            batches,
            remainder,
        } => {
            let parts = if remainder == 0 {
                format!(
                    "{batches} {} of {batch_size}",
                    plural(batches, "batch", "batches")
                )
            } else {
                format!(
                    "{batches} {} of {batch_size} plus {remainder}",
                    plural(batches, "batch", "batches")
                )
            };
            Some(format!(
                "Note: planned as {parts} seedlings; the chance shown is that of the \
                 weakest part, not the exact combined probability."
            ))
        }
        EstimationMethod::Exact | EstimationMethod::Degenerate => None,
    }
}

/// Probability as a percentage rounded to two decimals.
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}", probability * 100.0)
}

const fn plural(count: u32, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}
