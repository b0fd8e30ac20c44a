//! Validated input values for seed-count estimation.
//!
//! Each value can only be constructed through a checking constructor, so an
//! instance in hand is always inside its mathematical domain:
//!
//! | Type | Domain |
//! |------|--------|
//! | [`GerminationRate`] | `0 < p <= 1`, finite |
//! | [`DesiredCount`] | `k >= 1` |
//! | [`ConfidenceThreshold`] | `0 < c < 1`, finite |
//!
//! Deserialization goes through the same constructors, so malformed JSON
//! payloads are rejected rather than smuggled past validation.

use core::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{Parameter, ValidationError};

/// Probability that a single sown seed becomes a viable seedling.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[serde(try_from = "f64", into = "f64")]
#[ts(export, export_to = "bindings/", as = "f64")]
pub struct GerminationRate(f64);

impl GerminationRate {
    /// Validate and wrap a germination rate.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotFinite`] for NaN or infinities and
    /// [`ValidationError::OutsideDomain`] unless `0 < value <= 1`.
    pub const fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                parameter: Parameter::GerminationRate,
            });
        }
        if value <= 0.0 || value > 1.0 {
            return Err(ValidationError::OutsideDomain {
                parameter: Parameter::GerminationRate,
                value,
                constraint: "0 < p <= 1",
            });
        }
        Ok(Self(value))
    }

    /// Return the raw probability.
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whether every seed is guaranteed to germinate (`p = 1`).
    pub const fn is_certain(self) -> bool {
        self.0 >= 1.0
    }
}

impl TryFrom<f64> for GerminationRate {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GerminationRate> for f64 {
    fn from(rate: GerminationRate) -> Self {
        rate.0
    }
}

impl fmt::Display for GerminationRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of successful seedlings the grower wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "u32", into = "u32")]
#[ts(export, export_to = "bindings/", as = "u32")]
pub struct DesiredCount(u32);

impl DesiredCount {
    /// Validate and wrap a desired seedling count.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutsideDomain`] if `value` is zero.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::OutsideDomain {
                parameter: Parameter::DesiredCount,
                value: f64::from(value),
                constraint: "k >= 1",
            });
        }
        Ok(Self(value))
    }

    /// Return the raw count.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for DesiredCount {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DesiredCount> for u32 {
    fn from(count: DesiredCount) -> Self {
        count.0
    }
}

impl fmt::Display for DesiredCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimum acceptable probability of reaching the desired seedling count.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[serde(try_from = "f64", into = "f64")]
#[ts(export, export_to = "bindings/", as = "f64")]
pub struct ConfidenceThreshold(f64);

impl ConfidenceThreshold {
    /// Validate and wrap a confidence threshold.
    ///
    /// Both ends are open: a threshold of 1 can never be met by a finite
    /// number of seeds, and a threshold of 0 is met by sowing nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotFinite`] for NaN or infinities and
    /// [`ValidationError::OutsideDomain`] unless `0 < value < 1`.
    pub const fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                parameter: Parameter::Confidence,
            });
        }
        if value <= 0.0 || value >= 1.0 {
            return Err(ValidationError::OutsideDomain {
                parameter: Parameter::Confidence,
                value,
                constraint: "0 < c < 1",
            });
        }
        Ok(Self(value))
    }

    /// Return the raw probability.
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ConfidenceThreshold {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConfidenceThreshold> for f64 {
    fn from(threshold: ConfidenceThreshold) -> Self {
        threshold.0
    }
}

impl fmt::Display for ConfidenceThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
