use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::http::header;
use engagement_backend::config::Config;
use engagement_backend::detector::{DetectorError, DetectorPool, FaceMeshDetector, LandmarkDetector};
use engagement_backend::engagement::ScoringConfig;
use engagement_backend::logging::init_tracing;
use engagement_backend::pipeline::FramePipeline;
use engagement_backend::routes::build_router;
use engagement_backend::state::AppState;
use tokio::sync::broadcast;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    init_tracing(&config);
    tracing::info!("Starting engagement-backend");

    // The landmark model is the expensive resource: load the whole pool up
    // front and fail fast if the model is unusable.
    let pool = match build_detector_pool(&config) {
        Ok(pool) => Arc::new(pool),
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize landmark detector");
            std::process::exit(1);
        }
    };
    tracing::info!(
        pool_size = pool.size(),
        model = %config.detector.model_path,
        "detector pool ready"
    );

    let scoring = ScoringConfig {
        ear_thresh: config.scoring.ear_thresh,
        mar_thresh: config.scoring.mar_thresh,
    };
    let pipeline = Arc::new(FramePipeline::new(
        pool.clone(),
        scoring,
        config.frame.max_width,
    ));

    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let state = AppState::new(pipeline, &config, shutdown_tx.clone());

    let app = build_router(state)
        .layer(build_cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new());

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(shutdown_tx));
    if let Err(e) = server.await {
        tracing::error!(error = %e, "HTTP server crashed");
    }

    // Best-effort teardown; a second close (or a close after a failed
    // startup path) is a no-op.
    pool.close().await;
    tracing::info!("Shutdown complete");
}

fn build_detector_pool(config: &Config) -> Result<DetectorPool, DetectorError> {
    let model_path = Path::new(&config.detector.model_path);
    let size = config.detector.pool_size.max(1);

    let mut instances: Vec<Box<dyn LandmarkDetector>> = Vec::with_capacity(size);
    for _ in 0..size {
        instances.push(Box::new(FaceMeshDetector::load(
            model_path,
            config.detector.min_confidence,
        )?));
    }
    Ok(DetectorPool::new(instances))
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origin.trim() == "*" {
        // Wildcard is for development capture pages; wildcard and
        // credentials are mutually exclusive.
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_credentials(false)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_methods(Any);
    }

    match config.cors_origin.parse::<axum::http::HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_methods(Any),
        Err(e) => {
            panic!(
                "FATAL: Invalid CORS_ORIGIN '{}': {}. \
                 Fix the CORS_ORIGIN environment variable.",
                config.cors_origin, e
            );
        }
    }
}

async fn shutdown_signal(shutdown_tx: broadcast::Sender<()>) {
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = sigterm.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(());
}
