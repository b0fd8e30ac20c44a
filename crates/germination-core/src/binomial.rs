//! Binomial tail probabilities computed in log space.
//!
//! For `X ~ Binomial(n, p)` the lower tail `P(X < k)` is the sum of the
//! probability mass function over `0..k`:
//!
//! ```text
//! P(X = i) = C(n, i) * p^i * (1 - p)^(n - i)
//! ```
//!
//! Each term is evaluated as `ln C(n, i) + i ln p + (n - i) ln(1 - p)` so
//! that large `n` neither overflows the binomial coefficient nor underflows
//! the powers. `ln C(n, i)` is carried forward incrementally from
//! `ln C(n, 0) = 0` using `C(n, i + 1) = C(n, i) * (n - i) / (i + 1)`.
//!
//! Terms whose log-probability falls below a floor (default `-100`,
//! roughly `3.7e-44`) contribute exactly zero.

use germination_types::GerminationRate;

/// Default log-probability below which a mass-function term is treated as 0.
pub const DEFAULT_LOG_FLOOR: f64 = -100.0;

/// Precomputed logarithms for repeated tail evaluations at a fixed rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinomialTail {
    /// `ln p`.
    ln_success: f64,
    /// `ln(1 - p)`; `-inf` when `p = 1`.
    ln_failure: f64,
    /// Terms with a smaller log-probability are dropped.
    log_floor: f64,
}

impl BinomialTail {
    /// Prepare tail evaluations for the given germination rate.
    pub fn new(rate: GerminationRate, log_floor: f64) -> Self {
        let p = rate.value();
        Self {
            ln_success: p.ln(),
            ln_failure: (-p).ln_1p(),
            log_floor,
        }
    }

    /// Probability of strictly fewer than `successes` germinations among
    /// `trials` seeds.
    pub fn lower_tail(&self, trials: u32, successes: u32) -> f64 {
        if successes == 0 {
            return 0.0;
        }
        if trials < successes {
            return 1.0;
        }

        let n = f64::from(trials);
        let mut ln_choose = 0.0_f64;
        let mut cumulative = 0.0_f64;

        for i in 0..successes {
            let i = f64::from(i);
            let log_prob = i.mul_add(self.ln_success, (n - i).mul_add(self.ln_failure, ln_choose));
            if log_prob >= self.log_floor {
                cumulative += log_prob.exp();
            }
            ln_choose += (n - i).ln() - i.ln_1p();
        }

        cumulative.clamp(0.0, 1.0)
    }

    /// Probability of at least `successes` germinations among `trials`
    /// seeds.
    pub fn at_least(&self, trials: u32, successes: u32) -> f64 {
        1.0 - self.lower_tail(trials, successes)
    }
}

/// `P(X >= successes)` for `X ~ Binomial(trials, rate)` using the default
/// log floor.
pub fn tail_probability(trials: u32, successes: u32, rate: GerminationRate) -> f64 {
    BinomialTail::new(rate, DEFAULT_LOG_FLOOR).at_least(trials, successes)
}

/// `P(X < successes)` for `X ~ Binomial(trials, rate)` using the default
/// log floor.
pub fn lower_tail(trials: u32, successes: u32, rate: GerminationRate) -> f64 {
    BinomialTail::new(rate, DEFAULT_LOG_FLOOR).lower_tail(trials, successes)
}
