use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::round_to;

/// Kinetic energy in ft·lb, rounded to 0.01.
///
/// KE = w * v² / 450240 with w in grains and v in fps.
pub fn calculate_kinetic_energy(weight_gr: f64, speed_fps: f64) -> f64 {
    round_to(weight_gr * speed_fps * speed_fps / KE_DIVISOR, 2)
}

/// Kinetic energy from first principles, 0.5 * m * v² with m in slugs
pub fn calculate_kinetic_energy_classical(weight_gr: f64, speed_fps: f64) -> f64 {
    let weight_lb = weight_gr / GRAINS_PER_POUND;
    round_to(0.5 * weight_lb * speed_fps * speed_fps / G_ACCEL_FPS2, 2)
}

/// Energy still carried at 40 yards, by fixed retention factor
pub fn kinetic_energy_at_40_yards(initial_ke: f64) -> f64 {
    initial_ke * KE_RETENTION_40YD
}

/// Momentum in slug·fps
pub fn calculate_momentum(weight_gr: f64, speed_fps: f64) -> f64 {
    weight_gr * speed_fps / MOMENTUM_DIVISOR
}

/// Front-of-center percentage, rounded to 0.1 %.
///
/// The balance point is taken at the physical middle, so the result reduces
/// to the share of total weight carried by the point and insert.
pub fn calculate_foc(arrow_length_in: f64, point_weight_gr: f64, insert_weight_gr: f64, total_weight_gr: f64) -> f64 {
    if total_weight_gr <= 0.0 || arrow_length_in <= 0.0 {
        return 0.0;
    }

    let balance_point = arrow_length_in / 2.0;
    let front_weight = point_weight_gr + insert_weight_gr;
    let foc = ((balance_point - arrow_length_in / 2.0) / arrow_length_in) * 100.0
        + (front_weight / total_weight_gr) * 100.0;

    round_to(foc, 1)
}

/// 0-100 energy score, full marks at `KE_SCORE_CEILING`
pub fn kinetic_energy_score(ke_40yd: f64) -> f64 {
    (ke_40yd / KE_SCORE_CEILING * 100.0).min(100.0)
}

/// 0-100 score for how close FOC sits to the 12 % target
pub fn foc_score(foc_percentage: Option<f64>) -> f64 {
    match foc_percentage {
        Some(foc) if foc != 0.0 && !foc.is_nan() => {
            (100.0 - (foc - FOC_TARGET_PERCENT).abs() * FOC_SCORE_PENALTY).max(0.0)
        }
        _ => FOC_SCORE_UNKNOWN,
    }
}

/// Weighted composite of penetration, energy and FOC scores
pub fn calculate_performance_score(ke_40yd: f64, foc_percentage: Option<f64>) -> u32 {
    let composite = DEFAULT_PENETRATION_SCORE * 0.4
        + kinetic_energy_score(ke_40yd) * 0.3
        + foc_score(foc_percentage) * 0.3;
    composite.round().max(0.0) as u32
}

/// Game size an arrow's energy is suited to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenetrationCategory {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PenetrationCategory {
    pub fn from_kinetic_energy(ke: f64) -> Self {
        if ke >= 65.0 {
            PenetrationCategory::Excellent
        } else if ke >= 40.0 {
            PenetrationCategory::Good
        } else if ke >= 25.0 {
            PenetrationCategory::Fair
        } else {
            PenetrationCategory::Poor
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PenetrationCategory::Excellent => "Maximum penetration",
            PenetrationCategory::Good => "Good penetration",
            PenetrationCategory::Fair => "Limited penetration",
            PenetrationCategory::Poor => "Poor penetration",
        }
    }
}

impl std::fmt::Display for PenetrationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PenetrationCategory::Excellent => "excellent",
            PenetrationCategory::Good => "good",
            PenetrationCategory::Fair => "fair",
            PenetrationCategory::Poor => "poor",
        };
        write!(f, "{}", name)
    }
}

pub fn speed_rating(speed_fps: f64) -> &'static str {
    if speed_fps >= 350.0 {
        "Very Fast"
    } else if speed_fps >= 300.0 {
        "Fast"
    } else if speed_fps >= 250.0 {
        "Moderate"
    } else {
        "Slow"
    }
}

pub fn kinetic_energy_rating(ke: f64) -> &'static str {
    if ke >= 65.0 {
        "Excellent (Elk+)"
    } else if ke >= 40.0 {
        "Good (Deer)"
    } else if ke >= 25.0 {
        "Fair (Small Game)"
    } else {
        "Low"
    }
}

pub fn foc_rating(foc: f64) -> &'static str {
    if (15.0..=20.0).contains(&foc) {
        "Optimal (Hunting)"
    } else if (10.0..=15.0).contains(&foc) {
        "Good (Target)"
    } else if (8.0..=22.0).contains(&foc) {
        "Acceptable"
    } else {
        "Suboptimal"
    }
}
