use crate::api::SpineCalculationResult;
use crate::arrow::{ArrowSpecification, SetupArrowConfig};
use crate::bow::BowConfiguration;
use crate::compatibility::{calculate_compatibility_score, CompatibilityResult};
use crate::performance::{calculate_live_preview, PerformanceEstimate};
use crate::weight::select_spine_specification;

type Subscriber = Box<dyn Fn(&PerformanceEstimate) + Send>;

/// Current bow, arrow and setup with the performance derived from them.
///
/// Every mutation recomputes the estimate and then notifies subscribers in
/// registration order. The last write wins.
pub struct SetupState {
    bow: BowConfiguration,
    arrow: ArrowSpecification,
    setup: SetupArrowConfig,
    estimate: PerformanceEstimate,
    recommended_spine: Option<SpineCalculationResult>,
    subscribers: Vec<Subscriber>,
}

impl std::fmt::Debug for SetupState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupState")
            .field("bow", &self.bow)
            .field("arrow", &self.arrow)
            .field("setup", &self.setup)
            .field("estimate", &self.estimate)
            .field("recommended_spine", &self.recommended_spine)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for SetupState {
    fn default() -> Self {
        Self::new(BowConfiguration::default(), ArrowSpecification::default(), SetupArrowConfig::default())
    }
}

impl SetupState {
    pub fn new(bow: BowConfiguration, arrow: ArrowSpecification, setup: SetupArrowConfig) -> Self {
        let estimate = calculate_live_preview(&arrow, &bow, &setup);
        Self {
            bow,
            arrow,
            setup,
            estimate,
            recommended_spine: None,
            subscribers: Vec::new(),
        }
    }

    pub fn bow(&self) -> &BowConfiguration {
        &self.bow
    }

    pub fn arrow(&self) -> &ArrowSpecification {
        &self.arrow
    }

    pub fn setup(&self) -> &SetupArrowConfig {
        &self.setup
    }

    pub fn estimate(&self) -> &PerformanceEstimate {
        &self.estimate
    }

    pub fn recommended_spine(&self) -> Option<&SpineCalculationResult> {
        self.recommended_spine.as_ref()
    }

    /// Register a callback run after every recompute
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&PerformanceEstimate) + Send + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    /// Recalculate the estimate from the current inputs and notify
    pub fn recompute(&mut self) -> &PerformanceEstimate {
        self.estimate = calculate_live_preview(&self.arrow, &self.bow, &self.setup);
        for subscriber in &self.subscribers {
            subscriber(&self.estimate);
        }
        &self.estimate
    }

    pub fn set_bow(&mut self, bow: BowConfiguration) -> &PerformanceEstimate {
        self.bow = bow;
        self.recommended_spine = None;
        self.recompute()
    }

    pub fn set_arrow(&mut self, arrow: ArrowSpecification) -> &PerformanceEstimate {
        self.arrow = arrow;
        self.recompute()
    }

    pub fn set_setup(&mut self, setup: SetupArrowConfig) -> &PerformanceEstimate {
        self.setup = setup;
        self.recompute()
    }

    /// Apply a partial change to the bow
    pub fn update_bow(&mut self, update: impl FnOnce(&mut BowConfiguration)) -> &PerformanceEstimate {
        update(&mut self.bow);
        self.recommended_spine = None;
        self.recompute()
    }

    /// Apply a partial change to the setup
    pub fn update_setup(&mut self, update: impl FnOnce(&mut SetupArrowConfig)) -> &PerformanceEstimate {
        update(&mut self.setup);
        self.recompute()
    }

    /// Store a spine recommendation for the current bow
    pub fn set_recommended_spine(&mut self, result: SpineCalculationResult) -> &PerformanceEstimate {
        self.setup.calculated_spine = Some(result.recommended_spine.clone());
        self.recommended_spine = Some(result);
        self.recompute()
    }

    pub fn reset(&mut self) -> &PerformanceEstimate {
        self.bow = BowConfiguration::default();
        self.arrow = ArrowSpecification::default();
        self.setup = SetupArrowConfig::default();
        self.recommended_spine = None;
        self.recompute()
    }

    /// How the selected spine row suits the stored recommendation
    pub fn compatibility(&self) -> Option<CompatibilityResult> {
        let recommended = self.recommended_spine.as_ref()?;
        let spec = select_spine_specification(&self.arrow.spine_specifications, self.setup.calculated_spine.as_ref())?;
        Some(calculate_compatibility_score(
            &spec.spine,
            &recommended.recommended_spine,
            self.bow.bow_type,
            &self.arrow.manufacturer,
        ))
    }

    /// e.g. `60lbs bow, 29" draw`
    pub fn config_summary(&self) -> String {
        format!("{}lbs bow, {}\" draw", self.bow.draw_weight, self.bow.draw_length)
    }

    /// e.g. `29" carbon arrow with 100gn point`, from the same setup the
    /// estimate is computed from
    pub fn arrow_setup_description(&self) -> String {
        format!(
            "{}\" {} arrow with {}gn point",
            self.setup.arrow_length, self.bow.arrow_material, self.setup.point_weight
        )
    }
}
