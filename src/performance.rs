use serde::{Deserialize, Serialize};

use crate::api::{PerformanceSummary, SpeedSource};
use crate::arrow::{ArrowSpecification, SetupArrowConfig};
use crate::bow::BowConfiguration;
use crate::energy::*;
use crate::speed::estimate_speed;
use crate::weight::calculate_total_weight;

/// Locally computed performance figures for one arrow setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEstimate {
    pub total_weight: f64,           // gr
    pub estimated_speed_fps: f64,    // fps
    pub kinetic_energy_initial: f64, // ft·lb
    pub kinetic_energy_40yd: f64,    // ft·lb
    pub momentum: f64,               // slug·fps
    pub foc_percentage: f64,         // %
    pub performance_score: u32,
    pub speed_source: SpeedSource,
}

impl PerformanceEstimate {
    /// Derive energy, FOC and score from a known weight and speed
    pub fn from_speed(setup: &SetupArrowConfig, total_weight: f64, speed_fps: f64, speed_source: SpeedSource) -> Self {
        let kinetic_energy = calculate_kinetic_energy(total_weight, speed_fps);
        let kinetic_energy_40yd = kinetic_energy_at_40_yards(kinetic_energy);
        let foc = calculate_foc(setup.arrow_length, setup.point_weight, setup.insert_weight, total_weight);

        Self {
            total_weight,
            estimated_speed_fps: speed_fps,
            kinetic_energy_initial: kinetic_energy,
            kinetic_energy_40yd,
            momentum: calculate_momentum(total_weight, speed_fps),
            foc_percentage: foc,
            performance_score: calculate_performance_score(kinetic_energy_40yd, Some(foc)),
            speed_source,
        }
    }

    pub fn penetration_category(&self) -> PenetrationCategory {
        PenetrationCategory::from_kinetic_energy(self.kinetic_energy_40yd)
    }
}

/// Instant preview without any remote call.
///
/// Weight, speed, energy, FOC and score are chained from the local
/// estimators.
pub fn calculate_live_preview(
    arrow: &ArrowSpecification,
    bow: &BowConfiguration,
    setup: &SetupArrowConfig,
) -> PerformanceEstimate {
    let total_weight = calculate_total_weight(arrow, setup);
    let speed = estimate_speed(bow, total_weight);
    PerformanceEstimate::from_speed(setup, total_weight, speed, SpeedSource::LiveEstimated)
}

/// Performance summary used when the trajectory service is unavailable.
///
/// FOC is not measured here and reports the usual target value.
pub fn simplified_performance_summary(total_weight: f64, speed_fps: f64, speed_source: SpeedSource) -> PerformanceSummary {
    let kinetic_energy_initial = calculate_kinetic_energy(total_weight, speed_fps);
    let kinetic_energy_40yd = kinetic_energy_at_40_yards(kinetic_energy_initial);

    PerformanceSummary {
        estimated_speed_fps: speed_fps,
        total_arrow_weight: total_weight,
        kinetic_energy_initial,
        kinetic_energy_40yd,
        foc_percentage: crate::constants::DEFAULT_FOC_PERCENT,
        penetration_category: PenetrationCategory::from_kinetic_energy(kinetic_energy_40yd).to_string(),
        penetration_score: kinetic_energy_score(kinetic_energy_40yd),
        momentum: calculate_momentum(total_weight, speed_fps),
        speed_source,
        confidence: None,
    }
}

fn is_blank(value: f64) -> bool {
    value == 0.0 || value.is_nan()
}

pub fn format_speed(speed_fps: f64) -> String {
    if is_blank(speed_fps) {
        return "0 fps".to_string();
    }
    format!("{:.1} fps", speed_fps)
}

pub fn format_kinetic_energy(ke: f64) -> String {
    if is_blank(ke) {
        return "0 ft·lbs".to_string();
    }
    format!("{:.2} ft·lbs", ke)
}

pub fn format_foc(foc: f64) -> String {
    if is_blank(foc) {
        return "0%".to_string();
    }
    format!("{:.1}%", foc)
}

pub fn format_momentum(momentum: f64) -> String {
    if is_blank(momentum) {
        return "0 slug·fps".to_string();
    }
    format!("{:.2} slug·fps", momentum)
}
