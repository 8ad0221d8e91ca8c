//! # Archery Engine
//!
//! Arrow performance estimation and spine compatibility scoring for bow
//! tuning, with a client for the remote tuning service and local fallbacks
//! when it is unreachable.

// Re-export the main types and functions
pub use api::{
    ApiConfig, ArcheryApi, HttpArcheryApi, PerformanceSummary, SpeedSource, SpineCalculationRequest,
    SpineCalculationResult, SpineRange, SpineSource, TrajectoryData, TrajectoryRequest,
};
pub use arrow::{ArrowSpecification, ArrowSpineSpecification, SetupArrowConfig, SpineValue};
pub use bow::{ArrowMaterial, BowConfiguration, BowType};
pub use compatibility::{calculate_compatibility_score, find_best_spine_match, CompatibilityResult, SpineMatch};
pub use energy::{calculate_foc, calculate_kinetic_energy, calculate_momentum, PenetrationCategory};
pub use error::{ArcheryError, Result};
pub use performance::{calculate_live_preview, PerformanceEstimate};
pub use service::{ResolvedSpeed, TuningService};
pub use speed::estimate_speed;
pub use spine_fallback::calculate_spine_fallback;
pub use state::SetupState;
pub use weight::calculate_total_weight;

// Module declarations
pub mod api;
pub mod arrow;
pub mod bow;
pub mod compatibility;
pub mod constants;
pub mod energy;
pub mod error;
pub mod logging;
pub mod performance;
pub mod service;
pub mod speed;
pub mod spine_fallback;
pub mod state;
pub mod weight;

/// Round half away from zero to `decimals` places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
