//! Wire types and client for the remote tuning service.
//!
//! The service owns the authoritative spine, trajectory and chronograph
//! calculations. This module only assembles requests and decodes responses.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::arrow::SpineValue;
use crate::bow::{BowConfiguration, BowType};
use crate::constants::*;
use crate::error::{ArcheryError, Result};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

const SPINE_ENDPOINT: &str = "/tuning/calculate-spine";
const TRAJECTORY_ENDPOINT: &str = "/calculate-trajectory";
const SPEED_ESTIMATE_ENDPOINT: &str = "/calculator/arrow-speed-estimate";

/// Where to reach the tuning service
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_API_TIMEOUT,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

// Spine calculation

/// Whether a spine recommendation came from the service or the local formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpineSource {
    #[default]
    Api,
    Fallback,
}

impl std::fmt::Display for SpineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpineSource::Api => write!(f, "api"),
            SpineSource::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineRange {
    #[serde(alias = "minimum")]
    pub min: SpineValue,
    #[serde(alias = "maximum")]
    pub max: SpineValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal: Option<SpineValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineCalculationDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_spine: Option<f64>,
    #[serde(default)]
    pub adjustments: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_adjustment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_spine: Option<SpineValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bow_type: Option<String>,
    /// Free-form confidence label or figure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineCalculationResult {
    pub recommended_spine: SpineValue,
    pub spine_range: SpineRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculations: Option<SpineCalculationDetails>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default)]
    pub source: SpineSource,
}

/// Optional manufacturer chart to calculate against
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSelection {
    #[serde(rename = "manufacturer_chart", skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineCalculationRequest {
    #[serde(flatten)]
    pub bow: BowConfiguration,
    #[serde(flatten)]
    pub chart: ChartSelection,
}

impl From<BowConfiguration> for SpineCalculationRequest {
    fn from(bow: BowConfiguration) -> Self {
        Self {
            bow,
            chart: ChartSelection::default(),
        }
    }
}

// Trajectory

/// How an arrow speed figure was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedSource {
    Chronograph,
    EnhancedEstimated,
    #[default]
    Estimated,
    LiveEstimated,
}

impl SpeedSource {
    /// Short label shown next to a speed figure
    pub fn label(&self) -> &'static str {
        match self {
            SpeedSource::Chronograph => "Measured",
            SpeedSource::EnhancedEstimated => "Enhanced",
            SpeedSource::LiveEstimated => "Live",
            SpeedSource::Estimated => "Estimated",
        }
    }
}

impl std::fmt::Display for SpeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SpeedSource::Chronograph => "chronograph",
            SpeedSource::EnhancedEstimated => "enhanced_estimated",
            SpeedSource::Estimated => "estimated",
            SpeedSource::LiveEstimated => "live_estimated",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryArrowData {
    pub estimated_speed_fps: f64,
    pub total_weight: f64,
    pub outer_diameter: f64,
    pub arrow_type: String,
    pub manufacturer: String,
    pub model_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spine: Option<SpineValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow_id: Option<i64>,
    pub speed_source: SpeedSource,
}

impl Default for TrajectoryArrowData {
    fn default() -> Self {
        Self {
            estimated_speed_fps: DEFAULT_TRAJECTORY_SPEED_FPS,
            total_weight: 0.0,
            outer_diameter: DEFAULT_OUTER_DIAMETER_IN,
            arrow_type: "hunting".to_string(),
            manufacturer: "Unknown".to_string(),
            model_name: "Unknown".to_string(),
            spine: None,
            setup_id: None,
            arrow_id: None,
            speed_source: SpeedSource::Estimated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryBowConfig {
    pub draw_weight: f64,
    pub bow_type: BowType,
    pub draw_length: f64,
}

impl Default for TrajectoryBowConfig {
    fn default() -> Self {
        Self {
            draw_weight: DEFAULT_TRAJECTORY_DRAW_WEIGHT,
            bow_type: BowType::Compound,
            draw_length: DEFAULT_DRAW_LENGTH_IN,
        }
    }
}

impl From<&BowConfiguration> for TrajectoryBowConfig {
    fn from(bow: &BowConfiguration) -> Self {
        let defaults = Self::default();
        Self {
            draw_weight: if bow.draw_weight > 0.0 { bow.draw_weight } else { defaults.draw_weight },
            bow_type: bow.bow_type,
            draw_length: if bow.draw_length > 0.0 { bow.draw_length } else { defaults.draw_length },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalConditions {
    pub temperature_f: f64,
    pub wind_speed_mph: f64,
    pub humidity_percent: f64,
    pub altitude_feet: f64,
}

impl Default for EnvironmentalConditions {
    fn default() -> Self {
        Self {
            temperature_f: 70.0,
            wind_speed_mph: 0.0,
            humidity_percent: 50.0,
            altitude_feet: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootingConditions {
    pub shot_angle_degrees: f64,
    pub sight_height_inches: f64,
    pub zero_distance_yards: f64,
}

impl Default for ShootingConditions {
    fn default() -> Self {
        Self {
            shot_angle_degrees: 0.0,
            sight_height_inches: 7.0,
            zero_distance_yards: 20.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRequest {
    pub arrow_data: TrajectoryArrowData,
    pub bow_config: TrajectoryBowConfig,
    pub environmental_conditions: EnvironmentalConditions,
    pub shooting_conditions: ShootingConditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub distance_yards: f64,
    pub velocity_fps: f64,
    pub drop_inches: f64,
    pub kinetic_energy_ft_lbs: f64,
    pub time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub estimated_speed_fps: f64,
    pub total_arrow_weight: f64,
    pub kinetic_energy_initial: f64,
    pub kinetic_energy_40yd: f64,
    pub foc_percentage: f64,
    pub penetration_category: String,
    pub penetration_score: f64,
    pub momentum: f64,
    #[serde(default)]
    pub speed_source: SpeedSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryData {
    pub performance_summary: PerformanceSummary,
    #[serde(default)]
    pub trajectory_points: Vec<TrajectoryPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental_conditions: Option<EnvironmentalConditions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shooting_conditions: Option<ShootingConditions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub trajectory_data: Option<TrajectoryData>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TrajectoryResponse {
    pub fn into_result(self) -> Result<TrajectoryData> {
        match (self.success, self.trajectory_data) {
            (true, Some(data)) => Ok(data),
            _ => Err(ArcheryError::Remote(
                self.error.unwrap_or_else(|| "Failed to calculate trajectory".to_string()),
            )),
        }
    }
}

// Chronograph lookup

/// Method string the service reports when it answered from recorded data
pub const CHRONOGRAPH_METHOD: &str = "chronograph_data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedEstimateRequest {
    pub setup_id: i64,
    pub arrow_id: i64,
    pub bow_ibo_speed: f64,
    pub bow_draw_weight: f64,
    pub bow_draw_length: f64,
    pub arrow_weight_grains: f64,
}

impl SpeedEstimateRequest {
    /// Lookup keyed by ids only; the bow figures are ignored when recorded
    /// data exists
    pub fn chronograph_lookup(setup_id: i64, arrow_id: i64) -> Self {
        Self {
            setup_id,
            arrow_id,
            bow_ibo_speed: ATA_SPEED_COMPOUND,
            bow_draw_weight: DEFAULT_TRAJECTORY_DRAW_WEIGHT,
            bow_draw_length: DEFAULT_DRAW_LENGTH_IN,
            arrow_weight_grains: 400.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedEstimateResponse {
    pub calculation_method: String,
    #[serde(default)]
    pub estimated_speed_fps: Option<f64>,
    #[serde(default)]
    pub confidence_percent: Option<f64>,
}

impl SpeedEstimateResponse {
    /// Measured speed, if the answer came from chronograph data
    pub fn chronograph_speed(&self) -> Option<f64> {
        if self.calculation_method == CHRONOGRAPH_METHOD {
            self.estimated_speed_fps.filter(|speed| *speed > 0.0)
        } else {
            None
        }
    }
}

/// Remote calculations the tuning service offers
#[async_trait]
pub trait ArcheryApi: Send + Sync {
    async fn calculate_spine(&self, request: &SpineCalculationRequest) -> Result<SpineCalculationResult>;

    async fn calculate_trajectory(&self, request: &TrajectoryRequest) -> Result<TrajectoryData>;

    async fn arrow_speed_estimate(&self, request: &SpeedEstimateRequest) -> Result<SpeedEstimateResponse>;
}

/// HTTP implementation of [`ArcheryApi`]
#[derive(Debug, Clone)]
pub struct HttpArcheryApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpArcheryApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn post_json<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(%url, "sending request");

        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArcheryError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ArcheryApi for HttpArcheryApi {
    #[instrument(skip(self, request))]
    async fn calculate_spine(&self, request: &SpineCalculationRequest) -> Result<SpineCalculationResult> {
        self.post_json(SPINE_ENDPOINT, request).await
    }

    #[instrument(skip(self, request))]
    async fn calculate_trajectory(&self, request: &TrajectoryRequest) -> Result<TrajectoryData> {
        let response: TrajectoryResponse = self.post_json(TRAJECTORY_ENDPOINT, request).await?;
        response.into_result()
    }

    #[instrument(skip(self, request))]
    async fn arrow_speed_estimate(&self, request: &SpeedEstimateRequest) -> Result<SpeedEstimateResponse> {
        self.post_json(SPEED_ESTIMATE_ENDPOINT, request).await
    }
}

/// Stand-in for a switched-off tuning service; every call fails with
/// [`ArcheryError::Offline`] so callers take their local fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineApi;

#[async_trait]
impl ArcheryApi for OfflineApi {
    async fn calculate_spine(&self, _request: &SpineCalculationRequest) -> Result<SpineCalculationResult> {
        Err(ArcheryError::Offline)
    }

    async fn calculate_trajectory(&self, _request: &TrajectoryRequest) -> Result<TrajectoryData> {
        Err(ArcheryError::Offline)
    }

    async fn arrow_speed_estimate(&self, _request: &SpeedEstimateRequest) -> Result<SpeedEstimateResponse> {
        Err(ArcheryError::Offline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let config = ApiConfig::new("http://example.test/api/");
        assert_eq!(config.endpoint(SPINE_ENDPOINT), "http://example.test/api/tuning/calculate-spine");
        assert_eq!(ApiConfig::default().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_spine_request_flattens_chart() {
        let request = SpineCalculationRequest {
            bow: BowConfiguration::default(),
            chart: ChartSelection {
                manufacturer: Some("Easton".to_string()),
                chart_id: None,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["draw_weight"], 50.0);
        assert_eq!(json["bow_type"], "compound");
        assert_eq!(json["manufacturer_chart"], "Easton");
        assert!(json.get("chart_id").is_none());
    }

    #[test]
    fn test_decode_spine_result() {
        let body = r#"{
            "recommended_spine": 400,
            "spine_range": {"min": 375, "max": 425, "optimal": 400},
            "calculations": {
                "base_spine": 750,
                "adjustments": {"point_weight": -12.5, "cam_type": 0},
                "total_adjustment": -12.5,
                "bow_type": "compound",
                "confidence": "high"
            },
            "notes": []
        }"#;
        let result: SpineCalculationResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.recommended_spine, SpineValue::Numeric(400.0));
        assert_eq!(result.spine_range.min, SpineValue::Numeric(375.0));
        assert_eq!(result.source, SpineSource::Api);

        let details = result.calculations.unwrap();
        assert_eq!(details.base_spine, Some(750.0));
        assert_eq!(details.total_adjustment, Some(-12.5));
        assert_eq!(details.final_spine, None);
        assert_eq!(details.bow_type.as_deref(), Some("compound"));
        assert_eq!(details.confidence, Some(serde_json::json!("high")));
    }

    #[test]
    fn test_decode_spine_result_minimal() {
        let body = r#"{
            "recommended_spine": "45#",
            "spine_range": {"minimum": "40#", "maximum": "50#"},
            "calculations": {},
            "notes": ["wood shaft"]
        }"#;
        let result: SpineCalculationResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.spine_range.max.to_string(), "50#");
        assert_eq!(result.calculations.unwrap().base_spine, None);
        assert_eq!(result.notes, vec!["wood shaft".to_string()]);
    }

    #[test]
    fn test_trajectory_request_shape() {
        let request = TrajectoryRequest::default();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["arrow_data"]["estimated_speed_fps"], 280.0);
        assert_eq!(json["arrow_data"]["outer_diameter"], 0.246);
        assert_eq!(json["arrow_data"]["speed_source"], "estimated");
        assert_eq!(json["bow_config"]["drawWeight"], 60.0);
        assert_eq!(json["bow_config"]["bowType"], "compound");
        assert_eq!(json["environmental_conditions"]["altitude_feet"], 1000.0);
        assert_eq!(json["shooting_conditions"]["sight_height_inches"], 7.0);
    }

    #[test]
    fn test_trajectory_response_failure() {
        let response: TrajectoryResponse =
            serde_json::from_str(r#"{"success": false, "error": "arrow weight missing"}"#).unwrap();
        match response.into_result() {
            Err(ArcheryError::Remote(msg)) => assert_eq!(msg, "arrow weight missing"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_chronograph_speed() {
        let measured = SpeedEstimateResponse {
            calculation_method: CHRONOGRAPH_METHOD.to_string(),
            estimated_speed_fps: Some(287.4),
            confidence_percent: Some(95.0),
        };
        assert_eq!(measured.chronograph_speed(), Some(287.4));

        let estimated = SpeedEstimateResponse {
            calculation_method: "enhanced_estimate".to_string(),
            ..measured
        };
        assert_eq!(estimated.chronograph_speed(), None);
    }
}
