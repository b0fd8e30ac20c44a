//! Shared type definitions for the germination seed planner.
//!
//! This crate is the single source of truth for the values that flow
//! between the estimator and its callers. Types defined here flow
//! downstream to `TypeScript` via `ts-rs` for front-end consumers.
//!
//! # Modules
//!
//! - [`values`] -- Validated input values (germination rate, desired
//!   seedling count, confidence threshold)
//! - [`result`] -- Estimation output and the method that produced it
//! - [`error`] -- Validation errors naming the offending parameter

pub mod error;
pub mod result;
pub mod values;

// Re-export all public types at crate root for convenience.
pub use error::{Parameter, ValidationError};
pub use result::{EstimationMethod, EstimationResult};
pub use values::{ConfidenceThreshold, DesiredCount, GerminationRate};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. The files are written to the
        // `bindings/` directory relative to the crate root.
        use ts_rs::TS;

        let _ = crate::values::GerminationRate::export_all();
        let _ = crate::values::DesiredCount::export_all();
        let _ = crate::values::ConfidenceThreshold::export_all();
        let _ = crate::result::EstimationMethod::export_all();
        let _ = crate::result::EstimationResult::export_all();
    }

    #[test]
    fn value_types_bind_as_numbers() {
        use ts_rs::TS;

        assert_eq!(crate::values::GerminationRate::inline(), "number");
        assert_eq!(crate::values::DesiredCount::inline(), "number");
        assert_eq!(crate::values::ConfidenceThreshold::inline(), "number");
        assert!(
            crate::result::EstimationResult::inline().contains("seeds_to_sow: number"),
            "{}",
            crate::result::EstimationResult::inline()
        );
    }
}
