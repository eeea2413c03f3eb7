use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::Router;
use tokio::sync::broadcast;

use engagement_backend::config::{Config, DetectorConfig, FrameConfig, ScoringEnvConfig};
use engagement_backend::detector::{DetectorPool, LandmarkDetector};
use engagement_backend::engagement::ScoringConfig;
use engagement_backend::pipeline::FramePipeline;
use engagement_backend::routes::build_router;
use engagement_backend::state::AppState;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

/// Build the router around scripted detector instances. The config is
/// constructed directly instead of through env vars so parallel tests
/// never race on the process environment.
pub fn spawn_test_app(detectors: Vec<Box<dyn LandmarkDetector>>) -> TestApp {
    let config = Config {
        host: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
        port: 8000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "*".to_string(),
        detector: DetectorConfig {
            model_path: "unused-in-tests.onnx".to_string(),
            pool_size: detectors.len(),
            min_confidence: 0.5,
        },
        frame: FrameConfig { max_width: 960 },
        scoring: ScoringEnvConfig {
            ear_thresh: 0.21,
            mar_thresh: 0.60,
        },
    };

    let pool = Arc::new(DetectorPool::new(detectors));
    let pipeline = Arc::new(FramePipeline::new(
        pool,
        ScoringConfig::default(),
        config.frame.max_width,
    ));

    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let state = AppState::new(pipeline, &config, shutdown_tx);

    TestApp {
        app: build_router(state.clone()),
        state,
    }
}
