/// Reference values and lookup tables used by the arrow performance estimators.
///
/// Several historical revisions of these numbers exist. This module holds the
/// single canonical set; every estimator reads from here.

// Unit divisors

/// Kinetic energy divisor for grains and feet per second to foot-pounds
///
/// Derivation: KE = 0.5 * (w / 7000) * v² / 32.174 = w * v² / 450_436.
/// The archery industry rounds this to 450,240 and so do we.
pub const KE_DIVISOR: f64 = 450_240.0;

/// Momentum divisor for grains and feet per second to slug·fps
pub const MOMENTUM_DIVISOR: f64 = 225_218.0;

/// Grains per pound
pub const GRAINS_PER_POUND: f64 = 7000.0;

/// Gravitational acceleration in ft/s²
pub const G_ACCEL_FPS2: f64 = 32.174;

/// Fraction of launch energy still carried at 40 yards
///
/// A fixed multiplier, not a drag simulation.
pub const KE_RETENTION_40YD: f64 = 0.77;

// IBO speed model

/// IBO reference arrow weight (grains)
pub const IBO_REFERENCE_WEIGHT_GR: f64 = 350.0;

/// IBO reference draw weight for compound bows (lb)
pub const IBO_REFERENCE_DRAW_WEIGHT_COMPOUND: f64 = 70.0;

/// Reference draw weight for every other bow type (lb)
pub const IBO_REFERENCE_DRAW_WEIGHT_TRADITIONAL: f64 = 50.0;

/// IBO reference draw length for compound bows (in)
pub const IBO_REFERENCE_DRAW_LENGTH_COMPOUND: f64 = 30.0;

/// Reference draw length for every other bow type (in)
pub const IBO_REFERENCE_DRAW_LENGTH_TRADITIONAL: f64 = 28.0;

/// Speed change per pound of draw weight away from the reference (fps/lb)
pub const SPEED_PER_DRAW_POUND: f64 = 2.5;

/// Speed change per inch of draw length away from the reference (fps/in)
pub const SPEED_PER_DRAW_INCH: f64 = 10.0;

/// String material modifier (dacron equivalent)
pub const STRING_MODIFIER: f64 = 0.92;

/// Returned by the speed estimator when the arrow weight is unusable
pub const INVALID_SPEED_FPS: f64 = 0.0;

/// Bow efficiency factors
pub const EFFICIENCY_COMPOUND: f64 = 0.95;
pub const EFFICIENCY_RECURVE: f64 = 0.90;
pub const EFFICIENCY_LONGBOW: f64 = 0.88;
pub const EFFICIENCY_TRADITIONAL: f64 = 0.85;
pub const EFFICIENCY_BAREBOW: f64 = 0.88;

/// Default ATA speeds (fps) used when a bow has no IBO rating
///
/// These are the reduced "realistic" traditional figures, not the older
/// 210/190/180/200 set.
pub const ATA_SPEED_COMPOUND: f64 = 320.0;
pub const ATA_SPEED_RECURVE: f64 = 180.0;
pub const ATA_SPEED_LONGBOW: f64 = 140.0;
pub const ATA_SPEED_TRADITIONAL: f64 = 130.0;
pub const ATA_SPEED_BAREBOW: f64 = 170.0;

/// Speed clamp band for compound bows (fps)
pub const COMPOUND_SPEED_BAND: (f64, f64) = (180.0, 450.0);

/// Speed clamp band for recurve, longbow, traditional and barebow (fps)
pub const TRADITIONAL_SPEED_BAND: (f64, f64) = (120.0, 350.0);

// Component weight defaults (grains)

/// Arrow length used when a setup does not specify one (in)
pub const DEFAULT_ARROW_LENGTH_IN: f64 = 32.0;
pub const DEFAULT_POINT_WEIGHT_GR: f64 = 0.0;
pub const DEFAULT_NOCK_WEIGHT_GR: f64 = 10.0;
pub const DEFAULT_INSERT_WEIGHT_GR: f64 = 0.0;
pub const DEFAULT_BUSHING_WEIGHT_GR: f64 = 0.0;
pub const DEFAULT_FLETCHING_WEIGHT_GR: f64 = 15.0;

/// Default shaft GPI by material when catalog data is missing
pub const DEFAULT_GPI_CARBON: f64 = 8.9;
pub const DEFAULT_GPI_ALUMINUM: f64 = 12.0;

// Spine fallback

/// Spine units per pound of draw weight
pub const SPINE_PER_DRAW_POUND: f64 = 12.5;

/// Arrow length the spine formulas are referenced to (in)
pub const SPINE_REFERENCE_ARROW_LENGTH: f64 = 28.0;

/// Arrow length assumed for a bow configuration that omits it (in)
pub const DEFAULT_BOW_ARROW_LENGTH_IN: f64 = 29.0;

/// Spine units per inch of arrow length beyond the reference
pub const SPINE_PER_ARROW_INCH: f64 = 25.0;

/// Point weight the spine formula is referenced to (gr)
pub const SPINE_REFERENCE_POINT_WEIGHT: f64 = 125.0;

/// Spine units per grain of point weight beyond the reference
pub const SPINE_PER_POINT_GRAIN: f64 = 0.5;

pub const SPINE_OFFSET_RECURVE: f64 = 50.0;
pub const SPINE_OFFSET_TRADITIONAL: f64 = 100.0;

/// Width of the range reported around a fallback spine (±)
pub const FALLBACK_SPINE_RANGE: f64 = 25.0;

/// Width of the range reported around a fallback wood spine (± lb)
pub const WOOD_FALLBACK_SPINE_RANGE: f64 = 5.0;

/// Wood spine: pounds per inch of arrow length beyond the reference
pub const WOOD_SPINE_PER_ARROW_INCH: f64 = 2.0;

/// Wood spine: point weights and their adjustment indices
pub const WOOD_POINT_WEIGHT_TABLE: [(f64, i32); 4] = [(30.0, 1), (70.0, 2), (100.0, 3), (125.0, 4)];

/// Wood spine: index of the baseline point weight (100 gr)
pub const WOOD_BASELINE_POINT_INDEX: i32 = 3;

/// Wood spine: pounds per index step
pub const WOOD_POUNDS_PER_POINT_INDEX: f64 = 2.5;

// Compatibility tolerances (± spine units)

pub const SPINE_TOLERANCE_COMPOUND: f64 = 25.0;
pub const SPINE_TOLERANCE_RECURVE: f64 = 50.0;
pub const SPINE_TOLERANCE_TRADITIONAL: f64 = 75.0;

// Performance score

/// Penetration component used by the live composite score
pub const DEFAULT_PENETRATION_SCORE: f64 = 75.0;

/// 40-yard kinetic energy that maps to a full energy score (ft·lb)
pub const KE_SCORE_CEILING: f64 = 80.0;

/// FOC percentage the score is centred on
pub const FOC_TARGET_PERCENT: f64 = 12.0;

/// Score lost per percentage point of FOC away from the target
pub const FOC_SCORE_PENALTY: f64 = 5.0;

/// FOC score used when FOC is unknown
pub const FOC_SCORE_UNKNOWN: f64 = 50.0;

// Trajectory request defaults

pub const DEFAULT_TRAJECTORY_SPEED_FPS: f64 = 280.0;
pub const DEFAULT_OUTER_DIAMETER_IN: f64 = 0.246;
pub const DEFAULT_TRAJECTORY_DRAW_WEIGHT: f64 = 60.0;
pub const DEFAULT_DRAW_LENGTH_IN: f64 = 28.0;
pub const DEFAULT_FOC_PERCENT: f64 = 12.0;
