//! Local spine approximation used when the spine service cannot be reached.
//!
//! The formula is coarse. Results produced here are always
//! logged at `warn` level and flagged as fallback values.

use std::collections::BTreeMap;

use tracing::warn;

use crate::api::{SpineCalculationDetails, SpineCalculationResult, SpineRange, SpineSource};
use crate::arrow::SpineValue;
use crate::bow::{BowConfiguration, BowType};
use crate::constants::*;

/// Terms of a fallback spine calculation
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackBreakdown {
    pub base_spine: f64,
    pub length_adjustment: f64,
    pub point_weight_adjustment: f64,
    pub bow_type_adjustment: f64,
    pub final_spine: SpineValue,
}

fn bow_type_offset(bow_type: BowType) -> f64 {
    match bow_type {
        BowType::Recurve => SPINE_OFFSET_RECURVE,
        BowType::Traditional | BowType::Longbow => SPINE_OFFSET_TRADITIONAL,
        BowType::Compound | BowType::Barebow => 0.0,
    }
}

/// Index of the tabulated point weight nearest to `point_weight`.
///
/// On a tie the lighter entry wins.
pub fn wood_point_weight_index(point_weight: f64) -> i32 {
    let mut best = WOOD_POINT_WEIGHT_TABLE[0];
    for entry in WOOD_POINT_WEIGHT_TABLE.iter().skip(1) {
        if (entry.0 - point_weight).abs() < (best.0 - point_weight).abs() {
            best = *entry;
        }
    }
    best.1
}

fn non_wood_breakdown(bow: &BowConfiguration) -> FallbackBreakdown {
    let base_spine = bow.draw_weight * SPINE_PER_DRAW_POUND;
    let length_adjustment = (bow.arrow_length - SPINE_REFERENCE_ARROW_LENGTH) * SPINE_PER_ARROW_INCH;
    let point_weight_adjustment = (bow.point_weight - SPINE_REFERENCE_POINT_WEIGHT) * SPINE_PER_POINT_GRAIN;
    let bow_type_adjustment = bow_type_offset(bow.bow_type);

    let spine = base_spine + length_adjustment + point_weight_adjustment + bow_type_adjustment;

    FallbackBreakdown {
        base_spine,
        length_adjustment,
        point_weight_adjustment,
        bow_type_adjustment,
        final_spine: SpineValue::Numeric(spine.round()),
    }
}

fn wood_breakdown(bow: &BowConfiguration) -> FallbackBreakdown {
    let base_spine = bow.draw_weight;
    let length_adjustment = (bow.arrow_length - SPINE_REFERENCE_ARROW_LENGTH) * WOOD_SPINE_PER_ARROW_INCH;
    let index = wood_point_weight_index(bow.point_weight);
    let point_weight_adjustment = f64::from(index - WOOD_BASELINE_POINT_INDEX) * WOOD_POUNDS_PER_POINT_INDEX;

    let pounds = base_spine + length_adjustment + point_weight_adjustment;

    FallbackBreakdown {
        base_spine,
        length_adjustment,
        point_weight_adjustment,
        bow_type_adjustment: 0.0,
        final_spine: SpineValue::pounds(pounds.round() as i64),
    }
}

/// Fallback spine with its individual terms, without logging
pub fn spine_fallback_breakdown(bow: &BowConfiguration) -> FallbackBreakdown {
    if bow.arrow_material.is_wood() {
        wood_breakdown(bow)
    } else {
        non_wood_breakdown(bow)
    }
}

/// Approximate recommended spine.
///
/// Carbon, aluminum and composite shafts get a deflection number; wood shafts
/// get a pound rating such as `"50#"`.
pub fn calculate_spine_fallback(bow: &BowConfiguration) -> SpineValue {
    warn!(
        draw_weight = bow.draw_weight,
        bow_type = %bow.bow_type,
        material = %bow.arrow_material,
        "using local spine approximation; this is a fallback estimate, not a chart value"
    );
    spine_fallback_breakdown(bow).final_spine
}

/// Fallback result shaped like a spine service response
pub fn fallback_spine_result(bow: &BowConfiguration) -> SpineCalculationResult {
    let breakdown = spine_fallback_breakdown(bow);
    let recommended = calculate_spine_fallback(bow);

    let spine_range = match &recommended {
        SpineValue::Numeric(spine) => SpineRange {
            min: SpineValue::Numeric(spine - FALLBACK_SPINE_RANGE),
            max: SpineValue::Numeric(spine + FALLBACK_SPINE_RANGE),
            optimal: Some(recommended.clone()),
        },
        pounds => {
            let rating = pounds.as_number();
            SpineRange {
                min: SpineValue::pounds((rating - WOOD_FALLBACK_SPINE_RANGE).round() as i64),
                max: SpineValue::pounds((rating + WOOD_FALLBACK_SPINE_RANGE).round() as i64),
                optimal: Some(pounds.clone()),
            }
        }
    };

    let mut adjustments = BTreeMap::new();
    adjustments.insert("length_adjustment".to_string(), breakdown.length_adjustment);
    adjustments.insert("point_weight_adjustment".to_string(), breakdown.point_weight_adjustment);
    adjustments.insert("bow_type_adjustment".to_string(), breakdown.bow_type_adjustment);

    SpineCalculationResult {
        recommended_spine: recommended,
        spine_range,
        calculations: Some(SpineCalculationDetails {
            base_spine: Some(breakdown.base_spine),
            adjustments,
            total_adjustment: Some(
                breakdown.length_adjustment + breakdown.point_weight_adjustment + breakdown.bow_type_adjustment,
            ),
            final_spine: Some(breakdown.final_spine),
            bow_type: Some(bow.bow_type.to_string()),
            confidence: None,
        }),
        notes: Vec::new(),
        source: SpineSource::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bow::ArrowMaterial;

    fn bow(draw_weight: f64, arrow_length: f64, point_weight: f64, bow_type: BowType) -> BowConfiguration {
        BowConfiguration {
            draw_weight,
            arrow_length,
            point_weight,
            bow_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_compound_scenario() {
        // 750 + 25 - 12.5 = 762.5
        let config = bow(60.0, 29.0, 100.0, BowType::Compound);
        assert_eq!(calculate_spine_fallback(&config), SpineValue::Numeric(763.0));
    }

    #[test]
    fn test_bow_type_offsets() {
        let recurve = bow(40.0, 28.0, 125.0, BowType::Recurve);
        assert_eq!(calculate_spine_fallback(&recurve), SpineValue::Numeric(550.0));

        let traditional = bow(40.0, 28.0, 125.0, BowType::Traditional);
        assert_eq!(calculate_spine_fallback(&traditional), SpineValue::Numeric(600.0));

        let longbow = bow(40.0, 28.0, 125.0, BowType::Longbow);
        assert_eq!(calculate_spine_fallback(&longbow), SpineValue::Numeric(600.0));

        let barebow = bow(40.0, 28.0, 125.0, BowType::Barebow);
        assert_eq!(calculate_spine_fallback(&barebow), SpineValue::Numeric(500.0));
    }

    #[test]
    fn test_wood_scenario() {
        let config = BowConfiguration {
            arrow_material: ArrowMaterial::Wood,
            ..bow(50.0, 28.0, 100.0, BowType::Longbow)
        };
        assert_eq!(calculate_spine_fallback(&config), SpineValue::pounds(50));
        assert_eq!(calculate_spine_fallback(&config).to_string(), "50#");
    }

    #[test]
    fn test_wood_adjustments() {
        let config = BowConfiguration {
            arrow_material: ArrowMaterial::Wood,
            ..bow(45.0, 30.0, 125.0, BowType::Traditional)
        };
        // 45 + 4 + 2.5 = 51.5
        let breakdown = spine_fallback_breakdown(&config);
        assert_eq!(breakdown.length_adjustment, 4.0);
        assert_eq!(breakdown.point_weight_adjustment, 2.5);
        assert_eq!(breakdown.final_spine, SpineValue::pounds(52));
    }

    #[test]
    fn test_wood_point_index() {
        assert_eq!(wood_point_weight_index(20.0), 1);
        assert_eq!(wood_point_weight_index(60.0), 2);
        assert_eq!(wood_point_weight_index(100.0), 3);
        assert_eq!(wood_point_weight_index(145.0), 4);
        // equidistant from 70 and 100
        assert_eq!(wood_point_weight_index(85.0), 2);
    }

    #[test]
    fn test_fallback_result_shape() {
        let config = bow(60.0, 29.0, 100.0, BowType::Compound);
        let result = fallback_spine_result(&config);
        assert_eq!(result.source, SpineSource::Fallback);
        assert_eq!(result.spine_range.min, SpineValue::Numeric(738.0));
        assert_eq!(result.spine_range.max, SpineValue::Numeric(788.0));
        let details = result.calculations.unwrap();
        assert_eq!(details.base_spine, Some(750.0));
        assert_eq!(details.total_adjustment, Some(12.5));
        assert_eq!(details.adjustments["length_adjustment"], 25.0);
        assert_eq!(details.adjustments["point_weight_adjustment"], -12.5);
    }

    #[test]
    fn test_wood_fallback_range() {
        let config = BowConfiguration {
            arrow_material: ArrowMaterial::Wood,
            ..bow(50.0, 28.0, 100.0, BowType::Longbow)
        };
        let result = fallback_spine_result(&config);
        assert_eq!(result.recommended_spine, SpineValue::pounds(50));
        assert_eq!(result.spine_range.min, SpineValue::pounds(45));
        assert_eq!(result.spine_range.max, SpineValue::pounds(55));
        assert_eq!(result.spine_range.optimal, Some(SpineValue::pounds(50)));
    }
}
