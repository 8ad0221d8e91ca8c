use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use archery_engine::api::*;
use archery_engine::performance::simplified_performance_summary;
use archery_engine::service::TuningService;
use archery_engine::{
    ArcheryError, ArrowSpecification, ArrowSpineSpecification, BowConfiguration, BowType, SetupArrowConfig, SpineValue,
};

/// In-memory tuning service with canned answers; `None` answers fail with 503
#[derive(Default, Clone)]
struct MockApi {
    spine: Option<SpineCalculationResult>,
    trajectory: Option<TrajectoryData>,
    speed: Option<SpeedEstimateResponse>,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl MockApi {
    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

fn unavailable() -> ArcheryError {
    ArcheryError::Status {
        status: 503,
        reason: "Service Unavailable".to_string(),
    }
}

#[async_trait]
impl ArcheryApi for MockApi {
    async fn calculate_spine(&self, _request: &SpineCalculationRequest) -> archery_engine::Result<SpineCalculationResult> {
        self.record("spine");
        self.spine.clone().ok_or_else(unavailable)
    }

    async fn calculate_trajectory(&self, _request: &TrajectoryRequest) -> archery_engine::Result<TrajectoryData> {
        self.record("trajectory");
        self.trajectory.clone().ok_or_else(unavailable)
    }

    async fn arrow_speed_estimate(&self, _request: &SpeedEstimateRequest) -> archery_engine::Result<SpeedEstimateResponse> {
        self.record("speed");
        self.speed.clone().ok_or_else(unavailable)
    }
}

fn hunting_bow() -> BowConfiguration {
    BowConfiguration {
        draw_weight: 60.0,
        draw_length: 29.0,
        arrow_length: 29.0,
        point_weight: 100.0,
        bow_type: BowType::Compound,
        ..Default::default()
    }
}

fn charted_arrow() -> ArrowSpecification {
    ArrowSpecification {
        id: Some(12),
        manufacturer: "Victory".to_string(),
        model_name: "RIP".to_string(),
        spine_specifications: vec![ArrowSpineSpecification {
            spine: SpineValue::Numeric(350.0),
            outer_diameter: 0.288,
            gpi_weight: 9.0,
            inner_diameter: None,
        }],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_spine_from_service() {
    let api = MockApi {
        spine: Some(SpineCalculationResult {
            recommended_spine: SpineValue::Numeric(400.0),
            spine_range: SpineRange {
                min: SpineValue::Numeric(375.0),
                max: SpineValue::Numeric(425.0),
                optimal: None,
            },
            calculations: None,
            notes: Vec::new(),
            source: SpineSource::Api,
        }),
        ..Default::default()
    };
    let service = TuningService::new(api.clone());

    let result = service.recommend_spine(&hunting_bow()).await;
    assert_eq!(result.recommended_spine, SpineValue::Numeric(400.0));
    assert_eq!(result.source, SpineSource::Api);
    assert_eq!(api.calls(), vec!["spine"]);
}

#[tokio::test]
async fn test_spine_falls_back_when_service_fails() {
    let service = TuningService::new(MockApi::default());

    let result = service.recommend_spine(&hunting_bow()).await;
    assert_eq!(result.recommended_spine, SpineValue::Numeric(763.0));
    assert_eq!(result.source, SpineSource::Fallback);
}

#[tokio::test]
async fn test_chronograph_speed_takes_priority() {
    let api = MockApi {
        speed: Some(SpeedEstimateResponse {
            calculation_method: CHRONOGRAPH_METHOD.to_string(),
            estimated_speed_fps: Some(291.2),
            confidence_percent: Some(98.0),
        }),
        ..Default::default()
    };
    let service = TuningService::new(api.clone());
    let setup = SetupArrowConfig {
        setup_id: Some(3),
        arrow_id: Some(12),
        ..Default::default()
    };

    let speed = service.resolve_speed(&setup, &hunting_bow(), 420.0).await;
    assert_eq!(speed.speed_fps, 291.2);
    assert_eq!(speed.source, SpeedSource::Chronograph);
}

#[tokio::test]
async fn test_estimated_speed_without_chronograph_data() {
    let api = MockApi {
        speed: Some(SpeedEstimateResponse {
            calculation_method: "enhanced_estimate".to_string(),
            estimated_speed_fps: Some(305.0),
            confidence_percent: Some(70.0),
        }),
        ..Default::default()
    };
    let service = TuningService::new(api.clone());
    let bow = hunting_bow();
    let setup = SetupArrowConfig {
        setup_id: Some(3),
        arrow_id: Some(12),
        ..Default::default()
    };

    let speed = service.resolve_speed(&setup, &bow, 420.0).await;
    assert_eq!(speed.source, SpeedSource::Estimated);
    assert_eq!(speed.speed_fps, archery_engine::estimate_speed(&bow, 420.0));
}

#[tokio::test]
async fn test_no_lookup_without_ids() {
    let api = MockApi::default();
    let service = TuningService::new(api.clone());

    let speed = service.resolve_speed(&SetupArrowConfig::default(), &hunting_bow(), 420.0).await;
    assert_eq!(speed.source, SpeedSource::Estimated);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_failed_lookup_is_ignored() {
    let api = MockApi::default();
    let service = TuningService::new(api.clone());
    let setup = SetupArrowConfig {
        setup_id: Some(3),
        arrow_id: Some(12),
        ..Default::default()
    };

    let speed = service.resolve_speed(&setup, &hunting_bow(), 420.0).await;
    assert_eq!(speed.source, SpeedSource::Estimated);
    assert_eq!(api.calls(), vec!["speed"]);
}

#[tokio::test]
async fn test_trajectory_falls_back_to_simplified_summary() {
    let api = MockApi::default();
    let service = TuningService::new(api.clone());
    let arrow = charted_arrow();
    let setup = SetupArrowConfig {
        arrow_length: 29.0,
        point_weight: 100.0,
        ..Default::default()
    };
    let bow = hunting_bow();

    let data = service.calculate_trajectory(&arrow, &setup, &bow, None, None).await;

    // 9 * 29 + 100 + 10 + 15
    let summary = &data.performance_summary;
    assert_eq!(summary.total_arrow_weight, 386.0);
    assert_eq!(summary.foc_percentage, 12.0);
    assert_eq!(summary.speed_source, SpeedSource::Estimated);
    assert!(data.trajectory_points.is_empty());
    assert_eq!(
        summary,
        &simplified_performance_summary(386.0, archery_engine::estimate_speed(&bow, 386.0), SpeedSource::Estimated)
    );
    assert_eq!(api.calls(), vec!["trajectory"]);
}

#[tokio::test]
async fn test_trajectory_from_service() {
    let remote = TrajectoryData {
        performance_summary: simplified_performance_summary(400.0, 300.0, SpeedSource::EnhancedEstimated),
        trajectory_points: vec![TrajectoryPoint {
            distance_yards: 20.0,
            velocity_fps: 290.0,
            drop_inches: 0.0,
            kinetic_energy_ft_lbs: 74.7,
            time_seconds: 0.2,
        }],
        environmental_conditions: None,
        shooting_conditions: None,
    };
    let api = MockApi {
        trajectory: Some(remote.clone()),
        ..Default::default()
    };
    let service = TuningService::new(api);

    let data = service
        .calculate_trajectory(&charted_arrow(), &SetupArrowConfig::default(), &hunting_bow(), None, None)
        .await;
    assert_eq!(data, remote);
}

/// Serve one HTTP response on a local port and return the base URL
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];

        // headers, then as many body bytes as Content-Length announces
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{}/api", addr)
}

#[tokio::test]
async fn test_http_status_error() {
    let base = serve_once("HTTP/1.1 503 Service Unavailable", "").await;
    let api = HttpArcheryApi::new(ApiConfig::new(base)).unwrap();

    let request = SpineCalculationRequest::from(hunting_bow());
    match api.calculate_spine(&request).await {
        Err(ArcheryError::Status { status, reason }) => {
            assert_eq!(status, 503);
            assert_eq!(reason, "Service Unavailable");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_http_spine_success() {
    let base = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"recommended_spine": 400, "spine_range": {"min": 375, "max": 425}}"#,
    )
    .await;
    let service = TuningService::new(HttpArcheryApi::new(ApiConfig::new(base)).unwrap());

    let result = service.recommend_spine(&hunting_bow()).await;
    assert_eq!(result.recommended_spine, SpineValue::Numeric(400.0));
    assert_eq!(result.source, SpineSource::Api);
}

#[tokio::test]
async fn test_http_spine_service_shape() {
    let base = serve_once(
        "HTTP/1.1 200 OK",
        r#"{
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
        }"#,
    )
    .await;
    let service = TuningService::new(HttpArcheryApi::new(ApiConfig::new(base)).unwrap());

    let result = service.recommend_spine(&hunting_bow()).await;
    assert_eq!(result.source, SpineSource::Api);
    assert_eq!(result.recommended_spine, SpineValue::Numeric(400.0));
    assert_eq!(result.spine_range.optimal, Some(SpineValue::Numeric(400.0)));
    let details = result.calculations.unwrap();
    assert_eq!(details.total_adjustment, Some(-12.5));
    assert_eq!(details.adjustments["point_weight"], -12.5);
}

#[tokio::test]
async fn test_offline_api_always_falls_back() {
    let request = SpineCalculationRequest::from(hunting_bow());
    assert!(matches!(OfflineApi.calculate_spine(&request).await, Err(ArcheryError::Offline)));

    let service = TuningService::new(OfflineApi);
    let result = service.recommend_spine(&hunting_bow()).await;
    assert_eq!(result.source, SpineSource::Fallback);
    assert_eq!(result.recommended_spine, SpineValue::Numeric(763.0));

    let speed = service
        .resolve_speed(
            &SetupArrowConfig {
                setup_id: Some(3),
                arrow_id: Some(12),
                ..Default::default()
            },
            &hunting_bow(),
            420.0,
        )
        .await;
    assert_eq!(speed.source, SpeedSource::Estimated);
}

#[tokio::test]
async fn test_http_garbage_body_falls_back() {
    let base = serve_once("HTTP/1.1 200 OK", "not json").await;
    let service = TuningService::new(HttpArcheryApi::new(ApiConfig::new(base)).unwrap());

    let result = service.recommend_spine(&hunting_bow()).await;
    assert_eq!(result.source, SpineSource::Fallback);
}
