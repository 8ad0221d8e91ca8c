use serde::{Deserialize, Serialize};

use crate::arrow::{ArrowSpecification, ArrowSpineSpecification, SetupArrowConfig, SpineValue};
use crate::bow::ArrowMaterial;
use crate::round_to;

/// Where the shaft GPI used for a weight estimate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpiSource {
    SpineSpecification,
    SetupOverride,
    ArrowLevel,
    MaterialDefault,
}

/// Shaft weight and how it was derived
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaftWeight {
    pub gpi: f64,
    pub grains: f64,
    pub source: GpiSource,
}

/// Pick the spine row a setup is built from.
///
/// Rows are matched on their display text against `calculated_spine`; without
/// a match the first row in catalog order is used.
pub fn select_spine_specification<'a>(
    specs: &'a [ArrowSpineSpecification],
    calculated_spine: Option<&SpineValue>,
) -> Option<&'a ArrowSpineSpecification> {
    let wanted = calculated_spine.map(|s| s.to_string());

    wanted
        .and_then(|wanted| specs.iter().find(|spec| spec.spine.to_string() == wanted))
        .or_else(|| specs.first())
}

/// Resolve the shaft GPI and weight for an arrow in a setup.
///
/// A spine chart always wins. Without one the GPI falls back in order:
/// setup override, arrow-level GPI, material default.
pub fn resolve_shaft_weight(arrow: &ArrowSpecification, setup: &SetupArrowConfig) -> ShaftWeight {
    let (gpi, source) = match select_spine_specification(&arrow.spine_specifications, setup.calculated_spine.as_ref()) {
        Some(spec) => (spec.gpi_weight, GpiSource::SpineSpecification),
        None => match (setup.gpi_weight, arrow.gpi_weight) {
            (Some(gpi), _) if gpi > 0.0 => (gpi, GpiSource::SetupOverride),
            (_, Some(gpi)) if gpi > 0.0 => (gpi, GpiSource::ArrowLevel),
            _ => {
                let material = arrow.material.unwrap_or(ArrowMaterial::Carbon);
                (material.default_gpi(), GpiSource::MaterialDefault)
            }
        },
    };

    ShaftWeight {
        gpi,
        grains: gpi * setup.arrow_length,
        source,
    }
}

/// Total arrow weight in grains, rounded to 0.1 gr
pub fn calculate_total_weight(arrow: &ArrowSpecification, setup: &SetupArrowConfig) -> f64 {
    let shaft = resolve_shaft_weight(arrow, setup);
    round_to(shaft.grains + setup.component_weight(), 1)
}

/// Total weight for an already selected spine row
pub fn calculate_total_weight_for_spec(spec: &ArrowSpineSpecification, setup: &SetupArrowConfig) -> f64 {
    round_to(spec.gpi_weight * setup.arrow_length + setup.component_weight(), 1)
}
