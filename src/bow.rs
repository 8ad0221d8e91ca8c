use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Bow family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BowType {
    #[default]
    Compound,
    Recurve,
    Longbow,
    Traditional,
    Barebow,
}

impl BowType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "compound" => Some(BowType::Compound),
            "recurve" => Some(BowType::Recurve),
            "longbow" => Some(BowType::Longbow),
            "traditional" => Some(BowType::Traditional),
            "barebow" => Some(BowType::Barebow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BowType::Compound => "compound",
            BowType::Recurve => "recurve",
            BowType::Longbow => "longbow",
            BowType::Traditional => "traditional",
            BowType::Barebow => "barebow",
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, BowType::Compound)
    }

    /// Launch efficiency relative to an ideal bow
    pub fn efficiency(&self) -> f64 {
        match self {
            BowType::Compound => EFFICIENCY_COMPOUND,
            BowType::Recurve => EFFICIENCY_RECURVE,
            BowType::Longbow => EFFICIENCY_LONGBOW,
            BowType::Traditional => EFFICIENCY_TRADITIONAL,
            BowType::Barebow => EFFICIENCY_BAREBOW,
        }
    }

    /// ATA speed assumed when the bow has no IBO rating
    pub fn default_ata_speed(&self) -> f64 {
        match self {
            BowType::Compound => ATA_SPEED_COMPOUND,
            BowType::Recurve => ATA_SPEED_RECURVE,
            BowType::Longbow => ATA_SPEED_LONGBOW,
            BowType::Traditional => ATA_SPEED_TRADITIONAL,
            BowType::Barebow => ATA_SPEED_BAREBOW,
        }
    }

    /// Inclusive (min, max) band estimated speeds are clamped to
    pub fn speed_band(&self) -> (f64, f64) {
        if self.is_compound() {
            COMPOUND_SPEED_BAND
        } else {
            TRADITIONAL_SPEED_BAND
        }
    }

    /// ± spine units around a recommendation that still count as a match
    pub fn spine_tolerance(&self) -> f64 {
        match self {
            BowType::Compound => SPINE_TOLERANCE_COMPOUND,
            BowType::Recurve => SPINE_TOLERANCE_RECURVE,
            _ => SPINE_TOLERANCE_TRADITIONAL,
        }
    }
}

impl std::fmt::Display for BowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shaft material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrowMaterial {
    #[default]
    Carbon,
    Aluminum,
    Wood,
    Fiberglass,
    CarbonAluminum,
}

impl ArrowMaterial {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "carbon" => Some(ArrowMaterial::Carbon),
            "aluminum" | "aluminium" => Some(ArrowMaterial::Aluminum),
            "wood" => Some(ArrowMaterial::Wood),
            "fiberglass" => Some(ArrowMaterial::Fiberglass),
            "carbon-aluminum" | "carbon_aluminum" => Some(ArrowMaterial::CarbonAluminum),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArrowMaterial::Carbon => "carbon",
            ArrowMaterial::Aluminum => "aluminum",
            ArrowMaterial::Wood => "wood",
            ArrowMaterial::Fiberglass => "fiberglass",
            ArrowMaterial::CarbonAluminum => "carbon-aluminum",
        }
    }

    pub fn is_wood(&self) -> bool {
        matches!(self, ArrowMaterial::Wood)
    }

    /// Shaft GPI assumed when no catalog value is available
    pub fn default_gpi(&self) -> f64 {
        match self {
            ArrowMaterial::Aluminum => DEFAULT_GPI_ALUMINUM,
            _ => DEFAULT_GPI_CARBON,
        }
    }
}

impl std::fmt::Display for ArrowMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bow and arrow parameters every estimate is derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowConfiguration {
    pub draw_weight: f64,      // lb
    pub draw_length: f64,      // in
    #[serde(default)]
    pub bow_type: BowType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ibo_speed: Option<f64>, // fps
    #[serde(default)]
    pub arrow_material: ArrowMaterial,
    #[serde(default)]
    pub point_weight: f64,     // gr
    #[serde(default = "default_arrow_length")]
    pub arrow_length: f64,     // in
}

fn default_arrow_length() -> f64 {
    DEFAULT_BOW_ARROW_LENGTH_IN
}

impl Default for BowConfiguration {
    fn default() -> Self {
        Self {
            draw_weight: 50.0,
            draw_length: 28.0,
            bow_type: BowType::Compound,
            ibo_speed: None,
            arrow_material: ArrowMaterial::Carbon,
            point_weight: 100.0,
            arrow_length: default_arrow_length(),
        }
    }
}

impl BowConfiguration {
    /// IBO rating if known, otherwise the bow type's ATA default
    pub fn effective_ibo_speed(&self) -> f64 {
        match self.ibo_speed {
            Some(speed) if speed > 0.0 => speed,
            _ => self.bow_type.default_ata_speed(),
        }
    }
}
