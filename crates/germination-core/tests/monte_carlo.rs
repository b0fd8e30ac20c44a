//! Simulated sowing confirms the planned seed counts.
//!
//! Each scenario sows the planned number of seeds many times with a
//! seeded RNG and checks the observed success frequency against the
//! achieved confidence the estimator reported.

#![allow(clippy::unwrap_used, clippy::cast_precision_loss)]

use germination_core::estimate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROUNDS: u32 = 20_000;

/// Fraction of rounds in which at least `seedlings` of `seeds` germinate.
fn observed_success_rate(rng: &mut StdRng, p: f64, seeds: u32, seedlings: u32) -> f64 {
    let mut successes = 0_u32;
    for _ in 0..ROUNDS {
        let germinated = (0..seeds).filter(|_| rng.random_bool(p)).count();
        if germinated >= seedlings as usize {
            successes += 1;
        }
    }
    f64::from(successes) / f64::from(ROUNDS)
}

#[test]
fn planned_counts_hold_up_in_simulation() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for (p, k, c) in [(0.6, 10, 0.95), (0.3, 20, 0.9), (0.9, 5, 0.9)] {
        let plan = estimate(p, k, c).unwrap();
        let observed = observed_success_rate(&mut rng, p, plan.seeds_to_sow, k);

        // Standard error is below 0.0025 for these sample sizes.
        assert!(
            (observed - plan.achieved_confidence).abs() < 0.015,
            "p={p} k={k}: observed {observed}, planned {}",
            plan.achieved_confidence
        );
        assert!(observed > c - 0.015, "p={p} k={k}: observed {observed}");
    }
}

#[test]
fn chunked_plan_is_conservative_in_simulation() {
    let mut rng = StdRng::seed_from_u64(251);
    let plan = estimate(0.6, 251, 0.95).unwrap();
    assert!(plan.is_approximate());

    let observed = observed_success_rate(&mut rng, 0.6, plan.seeds_to_sow, 251);
    assert!(observed >= 0.95, "observed {observed}");
}
