//! Remote-first tuning operations with local fallbacks.
//!
//! Every operation here answers even when the tuning service is down. Remote
//! failures are logged at `warn` level and replaced by the local estimate.

use tracing::{debug, instrument, warn};

use crate::api::*;
use crate::arrow::{ArrowSpecification, SetupArrowConfig};
use crate::bow::BowConfiguration;
use crate::constants::*;
use crate::performance::simplified_performance_summary;
use crate::speed::estimate_speed;
use crate::spine_fallback::fallback_spine_result;
use crate::weight::{calculate_total_weight, select_spine_specification};

/// A launch speed and where it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSpeed {
    pub speed_fps: f64,
    pub source: SpeedSource,
}

/// Tuning operations over an injected [`ArcheryApi`]
#[derive(Debug, Clone)]
pub struct TuningService<A: ArcheryApi> {
    api: A,
}

impl<A: ArcheryApi> TuningService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Recommended spine for a bow, from the service or the local formula
    pub async fn recommend_spine(&self, bow: &BowConfiguration) -> SpineCalculationResult {
        self.recommend_spine_with_chart(SpineCalculationRequest::from(bow.clone())).await
    }

    #[instrument(skip(self, request), fields(draw_weight = request.bow.draw_weight, bow_type = %request.bow.bow_type))]
    pub async fn recommend_spine_with_chart(&self, request: SpineCalculationRequest) -> SpineCalculationResult {
        match self.api.calculate_spine(&request).await {
            Ok(result) => {
                debug!(spine = %result.recommended_spine, "spine from tuning service");
                result
            }
            Err(err) => {
                warn!(error = %err, "spine service unavailable, using local approximation");
                fallback_spine_result(&request.bow)
            }
        }
    }

    /// Measured chronograph speed for a setup, if one is on record.
    ///
    /// Lookup failures are logged and treated as "no data".
    #[instrument(skip(self))]
    pub async fn chronograph_speed(&self, setup_id: i64, arrow_id: i64) -> Option<f64> {
        let request = SpeedEstimateRequest::chronograph_lookup(setup_id, arrow_id);
        match self.api.arrow_speed_estimate(&request).await {
            Ok(response) => {
                let speed = response.chronograph_speed();
                debug!(method = %response.calculation_method, ?speed, "speed lookup answered");
                speed
            }
            Err(err) => {
                warn!(error = %err, "chronograph lookup failed");
                None
            }
        }
    }

    /// Speed for a setup, preferring recorded chronograph data over the
    /// local estimate
    pub async fn resolve_speed(&self, setup: &SetupArrowConfig, bow: &BowConfiguration, total_weight: f64) -> ResolvedSpeed {
        if let (Some(setup_id), Some(arrow_id)) = (setup.setup_id, setup.arrow_id) {
            if let Some(speed_fps) = self.chronograph_speed(setup_id, arrow_id).await {
                return ResolvedSpeed {
                    speed_fps,
                    source: SpeedSource::Chronograph,
                };
            }
        }

        ResolvedSpeed {
            speed_fps: estimate_speed(bow, total_weight),
            source: SpeedSource::Estimated,
        }
    }

    /// Trajectory for a setup.
    ///
    /// When the trajectory service fails the result carries only a simplified
    /// performance summary and no trajectory points.
    #[instrument(skip_all, fields(arrow = %arrow.model_name))]
    pub async fn calculate_trajectory(
        &self,
        arrow: &ArrowSpecification,
        setup: &SetupArrowConfig,
        bow: &BowConfiguration,
        environmental: Option<EnvironmentalConditions>,
        shooting: Option<ShootingConditions>,
    ) -> TrajectoryData {
        let total_weight = calculate_total_weight(arrow, setup);
        let speed = self.resolve_speed(setup, bow, total_weight).await;

        let mut request = build_trajectory_request(arrow, setup, bow, total_weight, speed);
        if let Some(environmental) = environmental {
            request.environmental_conditions = environmental;
        }
        if let Some(shooting) = shooting {
            request.shooting_conditions = shooting;
        }

        match self.api.calculate_trajectory(&request).await {
            Ok(data) => data,
            Err(err) => {
                warn!(error = %err, "trajectory service unavailable, using simplified summary");
                TrajectoryData {
                    performance_summary: simplified_performance_summary(
                        request.arrow_data.total_weight,
                        request.arrow_data.estimated_speed_fps,
                        request.arrow_data.speed_source,
                    ),
                    trajectory_points: Vec::new(),
                    environmental_conditions: Some(request.environmental_conditions),
                    shooting_conditions: Some(request.shooting_conditions),
                }
            }
        }
    }
}

/// Assemble a trajectory request, filling gaps with the request defaults
pub fn build_trajectory_request(
    arrow: &ArrowSpecification,
    setup: &SetupArrowConfig,
    bow: &BowConfiguration,
    total_weight: f64,
    speed: ResolvedSpeed,
) -> TrajectoryRequest {
    let defaults = TrajectoryArrowData::default();
    let spec = select_spine_specification(&arrow.spine_specifications, setup.calculated_spine.as_ref());

    let non_empty = |value: &str, fallback: String| if value.is_empty() { fallback } else { value.to_string() };

    let arrow_data = TrajectoryArrowData {
        estimated_speed_fps: if speed.speed_fps > 0.0 { speed.speed_fps } else { DEFAULT_TRAJECTORY_SPEED_FPS },
        total_weight,
        outer_diameter: spec
            .map(|s| s.outer_diameter)
            .filter(|d| *d > 0.0)
            .unwrap_or(defaults.outer_diameter),
        arrow_type: arrow
            .arrow_type
            .as_deref()
            .map(|t| non_empty(t, defaults.arrow_type.clone()))
            .unwrap_or(defaults.arrow_type),
        manufacturer: non_empty(&arrow.manufacturer, defaults.manufacturer),
        model_name: non_empty(&arrow.model_name, defaults.model_name),
        spine: spec.map(|s| s.spine.clone()).or_else(|| setup.calculated_spine.clone()),
        setup_id: setup.setup_id,
        arrow_id: setup.arrow_id.or(arrow.id),
        speed_source: speed.source,
    };

    TrajectoryRequest {
        arrow_data,
        bow_config: TrajectoryBowConfig::from(bow),
        environmental_conditions: EnvironmentalConditions::default(),
        shooting_conditions: ShootingConditions::default(),
    }
}
