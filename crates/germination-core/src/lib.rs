//! Seed-count estimation for the germination seed planner.
//!
//! Given a per-seed germination probability `p`, a desired seedling count
//! `k`, and a confidence threshold `c`, this crate finds the smallest
//! number of seeds `n` such that `P(X >= k) >= c` for
//! `X ~ Binomial(n, p)`.
//!
//! # Modules
//!
//! - [`binomial`] -- Log-space binomial tail probabilities.
//! - [`estimator`] -- [`SeedEstimator`]: the trial-count search, its
//!   iteration/time budget, and the chunked path for large counts.
//! - [`cache`] -- [`EstimateCache`]: caller-owned bounded LRU memoization.
//! - [`config`] -- Configuration loading from `germination-config.yaml`.
//! - [`report`] -- Human-readable and JSON presentation of results.
//! - [`error`] -- [`EstimateError`] and its classification.
//!
//! [`SeedEstimator`]: estimator::SeedEstimator
//! [`EstimateCache`]: cache::EstimateCache
//! [`EstimateError`]: error::EstimateError

pub mod binomial;
pub mod cache;
pub mod config;
pub mod error;
pub mod estimator;
pub mod report;

pub use cache::{CacheStats, EstimateCache};
pub use config::{ConfigError, EstimatorConfig, InputLimits, PlannerConfig};
pub use error::{ErrorKind, EstimateError};
pub use estimator::{SeedEstimator, estimate};
pub use report::Report;
