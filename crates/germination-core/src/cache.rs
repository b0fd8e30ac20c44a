//! Caller-owned memoization of estimates.
//!
//! Estimates are pure functions of `(p, k, c)` for a given estimator
//! configuration, so repeated queries can be answered from memory. The
//! cache is bounded and evicts the least recently used entry once full.
//! Failed estimates are never stored.
//!
//! A cache holds results from whichever [`SeedEstimator`] filled it; use
//! one cache per estimator configuration.

use std::num::NonZeroUsize;

use germination_types::{ConfidenceThreshold, DesiredCount, EstimationResult, GerminationRate};
use lru::LruCache;
use tracing::trace;

use crate::config::{CacheConfig, ConfigError};
use crate::error::EstimateError;
use crate::estimator::SeedEstimator;

/// Cache key: exact bit patterns of the validated inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    rate_bits: u64,
    seedlings: u32,
    confidence_bits: u64,
}

impl CacheKey {
    const fn new(
        rate: GerminationRate,
        seedlings: DesiredCount,
        confidence: ConfidenceThreshold,
    ) -> Self {
        Self {
            rate_bits: rate.value().to_bits(),
            seedlings: seedlings.get(),
            confidence_bits: confidence.value().to_bits(),
        }
    }
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that ran the estimator.
    pub misses: u64,
}

/// Bounded LRU cache of estimation results.
#[derive(Debug)]
pub struct EstimateCache {
    entries: LruCache<CacheKey, EstimationResult>,
    stats: CacheStats,
}

impl EstimateCache {
    /// Create a cache holding at most `capacity` results.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Create a cache from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the capacity is zero.
    pub fn from_config(config: &CacheConfig) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(config.capacity).ok_or_else(|| ConfigError::Invalid {
            reason: "cache.capacity must be at least 1".to_owned(),
        })?;
        Ok(Self::new(capacity))
    }

    /// Return the memoized result for these inputs, running `estimator`
    /// on a miss.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`SeedEstimator::estimate_validated`];
    /// errors are not cached.
    pub fn get_or_estimate(
        &mut self,
        estimator: &SeedEstimator,
        rate: GerminationRate,
        seedlings: DesiredCount,
        confidence: ConfidenceThreshold,
    ) -> Result<EstimationResult, EstimateError> {
        let key = CacheKey::new(rate, seedlings, confidence);

        if let Some(result) = self.entries.get(&key) {
            self.stats.hits = self.stats.hits.saturating_add(1);
            trace!(
                rate = rate.value(),
                seedlings = seedlings.get(),
                "estimate cache hit"
            );
            return Ok(*result);
        }

        self.stats.misses = self.stats.misses.saturating_add(1);
        let result = estimator.estimate_validated(rate, seedlings, confidence)?;
        self.entries.put(key, result);
        Ok(result)
    }

    /// Look up a memoized result without computing.
    pub fn peek(
        &self,
        rate: GerminationRate,
        seedlings: DesiredCount,
        confidence: ConfidenceThreshold,
    ) -> Option<&EstimationResult> {
        self.entries
            .peek(&CacheKey::new(rate, seedlings, confidence))
    }

    /// Number of memoized results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no results.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of results held.
    pub fn capacity(&self) -> NonZeroUsize {
        self.entries.cap()
    }

    /// Hit and miss counters since creation or the last [`clear`](Self::clear).
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every memoized result and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }
}
