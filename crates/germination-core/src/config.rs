//! Configuration loading and typed config structures for the seed planner.
//!
//! The canonical configuration lives in `germination-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty file (or no file) is valid.

use std::path::Path;
use std::time::Duration;

use germination_types::{
    ConfidenceThreshold, DesiredCount, GerminationRate, Parameter, ValidationError,
};
use serde::Deserialize;

use crate::binomial::DEFAULT_LOG_FLOOR;

/// Environment variable overriding [`EstimatorConfig::max_iterations`].
pub const ENV_MAX_ITERATIONS: &str = "GERMINATION_MAX_ITERATIONS";

/// Environment variable overriding [`EstimatorConfig::time_budget_ms`].
pub const ENV_TIME_BUDGET_MS: &str = "GERMINATION_TIME_BUDGET_MS";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level planner configuration.
///
/// Mirrors the structure of `germination-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlannerConfig {
    /// Search parameters and budgets.
    #[serde(default)]
    pub estimator: EstimatorConfig,

    /// Caller-side bounds on accepted inputs.
    #[serde(default)]
    pub input_limits: InputLimits,

    /// Memoization settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PlannerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the search budget:
    /// - `GERMINATION_MAX_ITERATIONS` overrides `estimator.max_iterations`
    /// - `GERMINATION_TIME_BUDGET_MS` overrides `estimator.time_budget_ms`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse_with(yaml, |name| std::env::var(name).ok())
    }

    /// Parse configuration from a YAML string, taking overrides from
    /// `lookup`. Validation runs once, after the overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML or
    /// [`ConfigError::Invalid`] if an override or the merged result is
    /// invalid.
    pub fn parse_with<F>(yaml: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::from_yaml(yaml)?;
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML or
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        let config = Self::from_yaml(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Deserialize without validating.
    fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to `()`, not a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from a variable lookup (normally the process
    /// environment).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if an override is not a valid
    /// unsigned integer.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_MAX_ITERATIONS) {
            self.estimator.max_iterations = parse_override(ENV_MAX_ITERATIONS, &val)?;
        }
        if let Some(val) = lookup(ENV_TIME_BUDGET_MS) {
            self.estimator.time_budget_ms = Some(parse_override(ENV_TIME_BUDGET_MS, &val)?);
        }
        Ok(())
    }

    /// Check every section for unusable values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.estimator.validate()?;
        self.input_limits.validate()?;
        if self.cache.capacity == 0 {
            return Err(ConfigError::Invalid {
                reason: "cache.capacity must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

fn parse_override(name: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|e| ConfigError::Invalid {
        reason: format!("invalid {name}: {e}"),
    })
}

/// Search parameters for the seed estimator.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct EstimatorConfig {
    /// Desired counts above this are split into batches of this size.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Log-probability below which a mass-function term counts as zero.
    #[serde(default = "default_log_floor")]
    pub log_floor: f64,

    /// Maximum probability evaluations per estimate.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,

    /// Optional wall-clock budget per estimate, in milliseconds.
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            log_floor: default_log_floor(),
            max_iterations: default_max_iterations(),
            time_budget_ms: None,
        }
    }
}

impl EstimatorConfig {
    /// Check the search parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `batch_size` or
    /// `max_iterations` is zero, or `log_floor` is not a finite negative
    /// number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid {
                reason: "estimator.batch_size must be at least 1".to_owned(),
            });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid {
                reason: "estimator.max_iterations must be at least 1".to_owned(),
            });
        }
        if !self.log_floor.is_finite() || self.log_floor >= 0.0 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "estimator.log_floor must be a finite negative number, got {}",
                    self.log_floor
                ),
            });
        }
        Ok(())
    }

    /// The wall-clock budget, if one is configured.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}

/// Bounds a front end places on user input.
///
/// These are narrower than the mathematical domain of each value: they
/// keep interactive requests cheap and sensible. The estimator itself
/// does not apply them.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct InputLimits {
    /// Smallest accepted germination rate.
    #[serde(default = "default_min_rate")]
    pub min_rate: f64,

    /// Largest accepted germination rate.
    #[serde(default = "default_max_rate")]
    pub max_rate: f64,

    /// Smallest accepted seedling count.
    #[serde(default = "default_min_seedlings")]
    pub min_seedlings: u32,

    /// Largest accepted seedling count.
    #[serde(default = "default_max_seedlings")]
    pub max_seedlings: u32,

    /// Smallest accepted confidence threshold.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Largest accepted confidence threshold.
    #[serde(default = "default_max_confidence")]
    pub max_confidence: f64,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_rate: default_min_rate(),
            max_rate: default_max_rate(),
            min_seedlings: default_min_seedlings(),
            max_seedlings: default_max_seedlings(),
            min_confidence: default_min_confidence(),
            max_confidence: default_max_confidence(),
        }
    }
}

impl InputLimits {
    /// Check already-validated inputs against these bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] for the first input outside
    /// its bounds.
    pub fn check(
        &self,
        rate: GerminationRate,
        seedlings: DesiredCount,
        confidence: ConfidenceThreshold,
    ) -> Result<(), ValidationError> {
        check_range(
            Parameter::GerminationRate,
            rate.value(),
            self.min_rate,
            self.max_rate,
        )?;
        check_range(
            Parameter::DesiredCount,
            f64::from(seedlings.get()),
            f64::from(self.min_seedlings),
            f64::from(self.max_seedlings),
        )?;
        check_range(
            Parameter::Confidence,
            confidence.value(),
            self.min_confidence,
            self.max_confidence,
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.min_rate <= self.max_rate
            && self.min_seedlings <= self.max_seedlings
            && self.min_confidence <= self.max_confidence;
        if !ordered {
            return Err(ConfigError::Invalid {
                reason: "input_limits: every minimum must not exceed its maximum".to_owned(),
            });
        }
        Ok(())
    }
}

fn check_range(parameter: Parameter, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            parameter,
            value,
            min,
            max,
        })
    }
}

/// Memoization settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of memoized estimates before LRU eviction.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for log lines.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_batch_size() -> u32 {
    250
}

const fn default_log_floor() -> f64 {
    DEFAULT_LOG_FLOOR
}

const fn default_max_iterations() -> u64 {
    1_000_000
}

const fn default_min_rate() -> f64 {
    0.1
}

const fn default_max_rate() -> f64 {
    1.0
}

const fn default_min_seedlings() -> u32 {
    1
}

const fn default_max_seedlings() -> u32 {
    10_000
}

const fn default_min_confidence() -> f64 {
    0.5
}

const fn default_max_confidence() -> f64 {
    0.99
}

const fn default_cache_capacity() -> usize {
    128
}

fn default_log_level() -> String {
    "warn".to_owned()
}
