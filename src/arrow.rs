use serde::{Deserialize, Serialize};

use crate::bow::ArrowMaterial;
use crate::constants::*;

/// A spine rating as it appears in catalogs and setups.
///
/// Carbon and aluminum shafts carry a deflection number (`500`), wood shafts
/// a pound rating (`"50#"`) and some catalogs list bands such as `"35-40"`.
/// Text values are kept verbatim so they can be matched and displayed as
/// entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpineValue {
    Numeric(f64),
    Text(String),
}

impl SpineValue {
    /// Wood spine in pound notation, e.g. `"50#"`
    pub fn pounds(value: i64) -> Self {
        SpineValue::Text(format!("{}#", value))
    }

    /// Numeric spine, NaN when the value cannot be read
    pub fn as_number(&self) -> f64 {
        match self {
            SpineValue::Numeric(v) => *v,
            SpineValue::Text(s) => parse_spine_number(s),
        }
    }

    /// False for zero, NaN and empty values
    pub fn is_present(&self) -> bool {
        match self {
            SpineValue::Numeric(v) => *v != 0.0 && !v.is_nan(),
            SpineValue::Text(s) => !s.is_empty(),
        }
    }

    pub fn is_pound_rated(&self) -> bool {
        matches!(self, SpineValue::Text(s) if s.contains('#') || s.to_lowercase().contains("lbs"))
    }
}

impl From<f64> for SpineValue {
    fn from(v: f64) -> Self {
        SpineValue::Numeric(v)
    }
}

impl From<i64> for SpineValue {
    fn from(v: i64) -> Self {
        SpineValue::Numeric(v as f64)
    }
}

impl From<&str> for SpineValue {
    fn from(s: &str) -> Self {
        SpineValue::Text(s.to_string())
    }
}

impl std::fmt::Display for SpineValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpineValue::Numeric(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{}", *v as i64),
            SpineValue::Numeric(v) => write!(f, "{}", v),
            SpineValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Read a spine number from catalog text.
///
/// Strips the `#` and `lbs` markers, then reads the longest leading numeric
/// prefix, so `"50#"` is 50, `"35-40"` is 35 and `"abc"` is NaN.
pub fn parse_spine_number(raw: &str) -> f64 {
    let cleaned = raw.replacen('#', "", 1).replacen("lbs", "", 1);
    let trimmed = cleaned.trim_start();

    let candidate: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
        .collect();

    (1..=candidate.len())
        .rev()
        .find_map(|end| candidate[..end].parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// One row of an arrow's spine chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowSpineSpecification {
    pub spine: SpineValue,
    #[serde(default)]
    pub outer_diameter: f64,   // in
    #[serde(default)]
    pub gpi_weight: f64,       // grains per inch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_diameter: Option<f64>,
}

/// Catalog entry for an arrow model
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrowSpecification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub model_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<ArrowMaterial>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_type: Option<String>,
    /// Arrow-level GPI for catalog rows without a spine chart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpi_weight: Option<f64>,
    /// Catalog order
    #[serde(default)]
    pub spine_specifications: Vec<ArrowSpineSpecification>,
}

fn default_arrow_length() -> f64 {
    DEFAULT_ARROW_LENGTH_IN
}

fn default_nock_weight() -> f64 {
    DEFAULT_NOCK_WEIGHT_GR
}

fn default_fletching_weight() -> f64 {
    DEFAULT_FLETCHING_WEIGHT_GR
}

/// How an arrow is built up for a particular bow setup.
///
/// Missing component weights take the `DEFAULT_*` constants; an explicit
/// zero is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupArrowConfig {
    #[serde(default = "default_arrow_length")]
    pub arrow_length: f64,     // in
    #[serde(default)]
    pub point_weight: f64,     // gr
    #[serde(default = "default_nock_weight")]
    pub nock_weight: f64,      // gr
    #[serde(default)]
    pub insert_weight: f64,    // gr
    #[serde(default)]
    pub bushing_weight: f64,   // gr
    #[serde(default = "default_fletching_weight")]
    pub fletching_weight: f64, // gr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_spine: Option<SpineValue>,
    /// Explicit shaft GPI, first in line when the arrow has no spine chart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpi_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_id: Option<i64>,
}

impl Default for SetupArrowConfig {
    fn default() -> Self {
        Self {
            arrow_length: DEFAULT_ARROW_LENGTH_IN,
            point_weight: DEFAULT_POINT_WEIGHT_GR,
            nock_weight: DEFAULT_NOCK_WEIGHT_GR,
            insert_weight: DEFAULT_INSERT_WEIGHT_GR,
            bushing_weight: DEFAULT_BUSHING_WEIGHT_GR,
            fletching_weight: DEFAULT_FLETCHING_WEIGHT_GR,
            calculated_spine: None,
            gpi_weight: None,
            setup_id: None,
            arrow_id: None,
        }
    }
}

impl SetupArrowConfig {
    /// Sum of everything that is not the shaft
    pub fn component_weight(&self) -> f64 {
        self.point_weight + self.nock_weight + self.insert_weight + self.bushing_weight + self.fletching_weight
    }

    /// Weight ahead of the shaft: point plus insert
    pub fn front_weight(&self) -> f64 {
        self.point_weight + self.insert_weight
    }
}
