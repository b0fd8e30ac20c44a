//! Minimum seed-count search.
//!
//! [`SeedEstimator::estimate`] finds the smallest number of seeds `n`, at or
//! above the expected count `floor(k / p)`, whose binomial tail
//! `P(X >= k)` meets the confidence threshold. Starting at the expectation
//! and stepping upward works because the tail is non-decreasing in `n` and
//! tends to 1.
//!
//! # Cost
//!
//! Each step sums `k` mass-function terms, so a search costs
//! `O(k * (n_final - n_start))`. Two controls keep it bounded:
//!
//! - Counts above [`EstimatorConfig::batch_size`] are split into batches
//!   (see [`EstimationMethod::Chunked`]), which caps `k` per search.
//! - Every estimate runs under an iteration budget and an optional
//!   wall-clock budget; exhausting either yields
//!   [`EstimateError::ComputationTimeout`].

use std::time::{Duration, Instant};

use germination_types::{
    ConfidenceThreshold, DesiredCount, EstimationMethod, EstimationResult, GerminationRate,
};
use tracing::{debug, trace, warn};

use crate::binomial::BinomialTail;
use crate::config::{ConfigError, EstimatorConfig};
use crate::error::EstimateError;

/// Estimate with the default configuration.
///
/// Convenience wrapper around [`SeedEstimator::estimate`].
///
/// # Errors
///
/// See [`SeedEstimator::estimate`].
pub fn estimate(
    rate: f64,
    seedlings: u32,
    confidence: f64,
) -> Result<EstimationResult, EstimateError> {
    SeedEstimator::default().estimate(rate, seedlings, confidence)
}

/// Stateless seed-count estimator.
///
/// Holds only its configuration, so a single instance can be shared across
/// threads and every call is a pure function of its inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedEstimator {
    config: EstimatorConfig,
}

impl SeedEstimator {
    /// Create an estimator with the given search parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration fails
    /// [`EstimatorConfig::validate`].
    pub fn new(config: EstimatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Return the search parameters.
    pub const fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Validate raw inputs and estimate the seed count.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidInput`] unless `0 < rate <= 1`,
    /// `seedlings >= 1` and `0 < confidence < 1`. Otherwise see
    /// [`estimate_validated`](Self::estimate_validated).
    pub fn estimate(
        &self,
        rate: f64,
        seedlings: u32,
        confidence: f64,
    ) -> Result<EstimationResult, EstimateError> {
        let rate = GerminationRate::new(rate)?;
        let seedlings = DesiredCount::new(seedlings)?;
        let confidence = ConfidenceThreshold::new(confidence)?;
        self.estimate_validated(rate, seedlings, confidence)
    }

    /// Estimate the seed count for already-validated inputs.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::ComputationTimeout`] when the budget runs
    /// out, [`EstimateError::SeedCountOverflow`] when the answer does not
    /// fit in a `u32`, and [`EstimateError::Numerical`] if a probability
    /// comes out non-finite.
    pub fn estimate_validated(
        &self,
        rate: GerminationRate,
        seedlings: DesiredCount,
        confidence: ConfidenceThreshold,
    ) -> Result<EstimationResult, EstimateError> {
        let k = seedlings.get();

        if rate.is_certain() {
            debug!(seedlings = k, "certain germination, one seed per seedling");
            return Ok(EstimationResult::certain(k));
        }

        let mut budget = SearchBudget::new(&self.config);
        let tail = BinomialTail::new(rate, self.config.log_floor);

        debug!(
            rate = rate.value(),
            seedlings = k,
            confidence = confidence.value(),
            batch_size = self.config.batch_size,
            "estimating seed count"
        );

        let result = if k > self.config.batch_size {
            self.estimate_chunked(&tail, rate, k, confidence.value(), &mut budget)?
        } else {
            let (seeds, achieved) = search(&tail, rate, k, confidence.value(), &mut budget)?;
            EstimationResult::exact(seeds, achieved)
        };

        debug!(
            seeds = result.seeds_to_sow,
            achieved_confidence = result.achieved_confidence,
            iterations = budget.iterations,
            approximate = result.is_approximate(),
            "estimate complete"
        );

        Ok(result)
    }

    /// Split `seedlings` into full batches plus a remainder and combine the
    /// independent per-part searches.
    fn estimate_chunked(
        &self,
        tail: &BinomialTail,
        rate: GerminationRate,
        seedlings: u32,
        confidence: f64,
        budget: &mut SearchBudget,
    ) -> Result<EstimationResult, EstimateError> {
        let batch_size = self.config.batch_size;
        let batches = seedlings
            .checked_div(batch_size)
            .ok_or(EstimateError::SeedCountOverflow)?;
        let remainder = seedlings
            .checked_rem(batch_size)
            .ok_or(EstimateError::SeedCountOverflow)?;

        trace!(batch_size, batches, remainder, "splitting into batches");

        let (batch_seeds, batch_confidence) = search(tail, rate, batch_size, confidence, budget)?;
        let (remainder_seeds, remainder_confidence) = if remainder == 0 {
            (0, 1.0)
        } else {
            search(tail, rate, remainder, confidence, budget)?
        };

        let seeds_to_sow = batch_seeds
            .checked_mul(batches)
            .and_then(|seeds| seeds.checked_add(remainder_seeds))
            .ok_or(EstimateError::SeedCountOverflow)?;

        Ok(EstimationResult {
            seeds_to_sow,
            achieved_confidence: batch_confidence.min(remainder_confidence),
            method: EstimationMethod::Chunked {
                batch_size,
                batches,
                remainder,
            },
        })
    }
}

/// Step upward from the expected seed count until the tail probability
/// meets `confidence`. Returns the seed count and its tail probability.
fn search(
    tail: &BinomialTail,
    rate: GerminationRate,
    seedlings: u32,
    confidence: f64,
    budget: &mut SearchBudget,
) -> Result<(u32, f64), EstimateError> {
    let mut trials = starting_trials(rate, seedlings)?;

    loop {
        budget.charge(trials)?;

        let achieved = tail.at_least(trials, seedlings);
        if !achieved.is_finite() {
            return Err(EstimateError::Numerical {
                reason: format!(
                    "tail probability is {achieved} for {trials} seeds and {seedlings} seedlings"
                ),
            });
        }
        if achieved >= confidence {
            return Ok((trials, achieved));
        }

        trials = trials
            .checked_add(1)
            .ok_or(EstimateError::SeedCountOverflow)?;
    }
}

/// `floor(seedlings / rate)`: the expected number of seeds needed.
fn starting_trials(rate: GerminationRate, seedlings: u32) -> Result<u32, EstimateError> {
    let expected = (f64::from(seedlings) / rate.value()).floor();
    if !expected.is_finite() || expected > f64::from(u32::MAX) {
        return Err(EstimateError::SeedCountOverflow);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let trials = expected as u32;
    Ok(trials)
}

/// Iteration and wall-clock allowance for one estimate.
#[derive(Debug)]
struct SearchBudget {
    started: Instant,
    max_iterations: u64,
    time_limit: Option<Duration>,
    iterations: u64,
}

impl SearchBudget {
    fn new(config: &EstimatorConfig) -> Self {
        Self {
            started: Instant::now(),
            max_iterations: config.max_iterations,
            time_limit: config.time_budget(),
            iterations: 0,
        }
    }

    /// Account for one probability evaluation at `trials` seeds.
    fn charge(&mut self, trials: u32) -> Result<(), EstimateError> {
        let elapsed = self.started.elapsed();
        let out_of_time = self.time_limit.is_some_and(|limit| elapsed >= limit);

        if self.iterations >= self.max_iterations || out_of_time {
            let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
            warn!(
                iterations = self.iterations,
                last_trials = trials,
                elapsed_ms,
                "seed search budget exhausted"
            );
            return Err(EstimateError::ComputationTimeout {
                iterations: self.iterations,
                last_trials: trials,
                elapsed_ms,
            });
        }

        self.iterations = self.iterations.saturating_add(1);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use germination_types::{Parameter, ValidationError};

    use super::*;
    use crate::error::ErrorKind;

    fn with_batch_size(batch_size: u32) -> SeedEstimator {
        SeedEstimator::new(EstimatorConfig {
            batch_size,
            ..EstimatorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn reference_scenario() {
        let result = estimate(0.6, 10, 0.95).unwrap();
        assert!((20..=24).contains(&result.seeds_to_sow));
        assert_eq!(result.seeds_to_sow, 23);
        assert!(result.achieved_confidence >= 0.95);
        assert!((result.achieved_confidence - 0.965_077_920_794_276_6).abs() < 1e-9);
        assert_eq!(result.method, EstimationMethod::Exact);
    }

    #[test]
    fn golden_values() {
        let cases = [
            (0.6, 1, 0.95, 4),
            (0.5, 2, 0.75, 5),
            (0.9, 5, 0.9, 7),
            (0.1, 1, 0.99, 44),
            (0.6, 10, 0.5, 16),
            (0.6, 10, 0.99, 26),
            (0.8, 10, 0.95, 16),
            (0.3, 20, 0.9, 83),
            (0.6, 250, 0.95, 445),
        ];
        for (p, k, c, expected) in cases {
            let result = estimate(p, k, c).unwrap();
            assert_eq!(result.seeds_to_sow, expected, "p={p} k={k} c={c}");
            assert!(result.achieved_confidence >= c);
        }
    }

    #[test]
    fn answer_is_smallest_above_expectation() {
        let rate = GerminationRate::new(0.3).unwrap();
        let tail = BinomialTail::new(rate, crate::binomial::DEFAULT_LOG_FLOOR);
        let result = estimate(0.3, 20, 0.9).unwrap();
        let start = starting_trials(rate, 20).unwrap();
        assert!(result.seeds_to_sow >= start);
        if result.seeds_to_sow > start {
            assert!(tail.at_least(result.seeds_to_sow - 1, 20) < 0.9);
        }
        assert!(
            (tail.at_least(result.seeds_to_sow, 20) - result.achieved_confidence).abs() < 1e-15
        );
    }

    #[test]
    fn certain_germination() {
        for (k, c) in [(1, 0.5), (10, 0.95), (10_000, 0.999)] {
            let result = estimate(1.0, k, c).unwrap();
            assert_eq!(result.seeds_to_sow, k);
            assert!((result.achieved_confidence - 1.0).abs() < f64::EPSILON);
            assert_eq!(result.method, EstimationMethod::Degenerate);
        }
    }

    #[test]
    fn rejects_zero_seedlings() {
        let err = estimate(0.6, 0, 0.95).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(matches!(
            err,
            EstimateError::InvalidInput(ValidationError::OutsideDomain {
                parameter: Parameter::DesiredCount,
                ..
            })
        ));
    }

    #[test]
    fn rejects_certain_confidence() {
        let err = estimate(0.6, 10, 1.0).unwrap_err();
        assert!(matches!(
            err,
            EstimateError::InvalidInput(ValidationError::OutsideDomain {
                parameter: Parameter::Confidence,
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_rates() {
        for p in [0.0, -0.5, 1.5, f64::NAN] {
            let err = estimate(p, 10, 0.9).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "p = {p}");
        }
        assert!(estimate(0.6, 10, 0.0).is_err());
    }

    #[test]
    fn iteration_budget_is_enforced() {
        // p = 0.1, k = 1, c = 0.99 evaluates n = 10..=44: 35 evaluations.
        let tight = SeedEstimator::new(EstimatorConfig {
            max_iterations: 34,
            ..EstimatorConfig::default()
        })
        .unwrap();
        let err = tight.estimate(0.1, 1, 0.99).unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(
            err,
            EstimateError::ComputationTimeout {
                iterations: 34,
                last_trials: 44,
                ..
            }
        ));

        let enough = SeedEstimator::new(EstimatorConfig {
            max_iterations: 35,
            ..EstimatorConfig::default()
        })
        .unwrap();
        assert_eq!(enough.estimate(0.1, 1, 0.99).unwrap().seeds_to_sow, 44);
    }

    #[test]
    fn zero_time_budget_times_out() {
        let estimator = SeedEstimator::new(EstimatorConfig {
            time_budget_ms: Some(0),
            ..EstimatorConfig::default()
        })
        .unwrap();
        let err = estimator.estimate(0.6, 10, 0.95).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn certain_germination_skips_budget() {
        let estimator = SeedEstimator::new(EstimatorConfig {
            time_budget_ms: Some(0),
            ..EstimatorConfig::default()
        })
        .unwrap();
        assert_eq!(estimator.estimate(1.0, 7, 0.9).unwrap().seeds_to_sow, 7);
    }

    #[test]
    fn chunked_just_above_batch() {
        let chunked = estimate(0.6, 251, 0.95).unwrap();
        assert_eq!(
            chunked.method,
            EstimationMethod::Chunked {
                batch_size: 250,
                batches: 1,
                remainder: 1,
            }
        );
        // 445 seeds for the batch of 250 plus 4 for the single remainder.
        assert_eq!(chunked.seeds_to_sow, 449);
        assert!(chunked.is_approximate());

        let unchunked = with_batch_size(1_000).estimate(0.6, 251, 0.95).unwrap();
        assert_eq!(unchunked.method, EstimationMethod::Exact);
        assert_eq!(unchunked.seeds_to_sow, 446);

        let remainder_only = estimate(0.6, 1, 0.95).unwrap();
        assert!(chunked.seeds_to_sow >= unchunked.seeds_to_sow);
        assert!(chunked.seeds_to_sow - unchunked.seeds_to_sow <= remainder_only.seeds_to_sow);
    }

    #[test]
    fn chunked_confidence_is_weakest_part() {
        let chunked = estimate(0.6, 251, 0.95).unwrap();
        let batch = estimate(0.6, 250, 0.95).unwrap();
        let remainder = estimate(0.6, 1, 0.95).unwrap();
        let weakest = batch.achieved_confidence.min(remainder.achieved_confidence);
        assert!((chunked.achieved_confidence - weakest).abs() < f64::EPSILON);
    }

    #[test]
    fn chunked_without_remainder() {
        let result = with_batch_size(10).estimate(0.6, 30, 0.95).unwrap();
        let batch = estimate(0.6, 10, 0.95).unwrap();
        assert_eq!(result.seeds_to_sow, batch.seeds_to_sow * 3);
        assert!((result.achieved_confidence - batch.achieved_confidence).abs() < f64::EPSILON);
        assert_eq!(
            result.method,
            EstimationMethod::Chunked {
                batch_size: 10,
                batches: 3,
                remainder: 0,
            }
        );
    }

    #[test]
    fn count_equal_to_batch_is_exact() {
        let result = estimate(0.6, 250, 0.95).unwrap();
        assert_eq!(result.method, EstimationMethod::Exact);
    }

    #[test]
    fn idempotent() {
        let estimator = SeedEstimator::default();
        let first = estimator.estimate(0.45, 37, 0.9).unwrap();
        for _ in 0..3 {
            assert_eq!(estimator.estimate(0.45, 37, 0.9).unwrap(), first);
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = SeedEstimator::new(EstimatorConfig {
            batch_size: 0,
            ..EstimatorConfig::default()
        });
        assert!(err.is_err());
    }

    #[test]
    fn overflow_is_reported() {
        let tiny = GerminationRate::new(1e-9).unwrap();
        assert!(matches!(
            starting_trials(tiny, 10),
            Err(EstimateError::SeedCountOverflow)
        ));
    }
}
