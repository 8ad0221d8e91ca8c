use serde::{Deserialize, Serialize};

use crate::arrow::{ArrowSpineSpecification, SpineValue};
use crate::bow::BowType;

/// How well an arrow spine suits a recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub score: u32,
    pub explanation: String,
    pub in_tolerance: bool,
}

impl CompatibilityResult {
    fn invalid() -> Self {
        Self {
            score: 0,
            explanation: "Invalid spine values".to_string(),
            in_tolerance: false,
        }
    }
}

/// Best scoring spine row for a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineMatch {
    pub best_spine: SpineValue,
    pub compatibility: CompatibilityResult,
}

/// Acceptable spine window around a recommendation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpineWindow {
    pub min: f64,
    pub max: f64,
}

impl SpineWindow {
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, spine: f64) -> bool {
        spine >= self.min && spine <= self.max
    }
}

/// Acceptable window for a manufacturer chart.
///
/// Every supported chart currently uses the same bow-type tolerances, so the
/// manufacturer does not move the window.
pub fn manufacturer_spine_window(recommended: f64, bow_type: BowType, _manufacturer: &str) -> SpineWindow {
    let tolerance = bow_type.spine_tolerance();
    SpineWindow {
        min: recommended - tolerance,
        max: recommended + tolerance,
    }
}

/// Score an arrow spine against a recommendation on a 0-100 scale.
///
/// Inside the window the score runs 100 → 75 from the centre to the edge in
/// three linear bands. Outside it falls 75 → 0 in three more bands, worded by
/// direction: below the window is too stiff, above it too weak.
pub fn calculate_compatibility_score(
    arrow_spine: &SpineValue,
    recommended_spine: &SpineValue,
    bow_type: BowType,
    manufacturer: &str,
) -> CompatibilityResult {
    let arrow = arrow_spine.as_number();
    let recommended = recommended_spine.as_number();

    if !arrow.is_finite() || !recommended.is_finite() || recommended <= 0.0 {
        return CompatibilityResult::invalid();
    }

    let window = manufacturer_spine_window(recommended, bow_type, manufacturer);
    let range = window.width();

    let (score, explanation, in_tolerance) = if window.contains(arrow) {
        let distance = (arrow - recommended).abs();

        let (score, explanation) = if distance <= range * 0.1 {
            (
                95.0 + 5.0 * (1.0 - distance / (range * 0.1)),
                "Excellent spine match - optimal performance expected",
            )
        } else if distance <= range * 0.3 {
            let position = (distance - range * 0.1) / (range * 0.2);
            (
                85.0 + 10.0 * (1.0 - position),
                "Very good spine match - excellent performance expected",
            )
        } else {
            let position = (distance - range * 0.3) / (range * 0.2);
            (
                75.0 + 10.0 * (1.0 - position),
                "Good spine match - performance suitable for most applications",
            )
        };
        (score, explanation.to_string(), true)
    } else {
        let too_stiff = arrow < window.min;
        let outside = if too_stiff { window.min - arrow } else { arrow - window.max };
        let direction = if too_stiff { "stiff" } else { "weak" };

        let (score, explanation) = if outside <= range * 0.2 {
            let proximity = 1.0 - outside / (range * 0.2);
            (
                50.0 + 25.0 * proximity,
                format!("Arrow is too {} - may work with tuning adjustments", direction),
            )
        } else if outside <= range * 0.5 {
            let proximity = 1.0 - (outside - range * 0.2) / (range * 0.3);
            (
                25.0 + 25.0 * proximity,
                format!("Arrow is significantly too {} - consider different arrow", direction),
            )
        } else {
            (
                (25.0 - outside / range * 50.0).max(0.0),
                format!("Arrow is far too {} - strongly recommend different arrow", direction),
            )
        };
        (score, explanation, false)
    };

    CompatibilityResult {
        score: score.clamp(0.0, 100.0).round() as u32,
        explanation,
        in_tolerance,
    }
}

/// The spine row that best suits a recommendation.
///
/// Rows with an empty or zero spine are skipped. The first row reaching the
/// top score wins.
pub fn find_best_spine_match(
    specs: &[ArrowSpineSpecification],
    recommended_spine: &SpineValue,
    bow_type: BowType,
    manufacturer: &str,
) -> Option<SpineMatch> {
    let mut best: Option<SpineMatch> = None;

    for spec in specs.iter().filter(|spec| spec.spine.is_present()) {
        let compatibility = calculate_compatibility_score(&spec.spine, recommended_spine, bow_type, manufacturer);
        let better = best
            .as_ref()
            .map_or(true, |current| compatibility.score > current.compatibility.score);

        if better {
            best = Some(SpineMatch {
                best_spine: spec.spine.clone(),
                compatibility,
            });
        }
    }

    best
}

/// Multiplicative tolerance band used by quick in/out checks
pub fn spine_tolerance(bow_type: BowType) -> (f64, f64) {
    match bow_type {
        BowType::Recurve => (0.80, 1.20),
        BowType::Traditional => (0.75, 1.25),
        _ => (0.85, 1.15),
    }
}

pub fn is_spine_in_tolerance(arrow_spine: &SpineValue, recommended_spine: &SpineValue, bow_type: BowType) -> bool {
    calculate_compatibility_score(arrow_spine, recommended_spine, bow_type, "easton").in_tolerance
}

/// Display text for a spine value; pound ratings keep their marker
pub fn format_spine_display(spine: &SpineValue) -> String {
    spine.to_string()
}
