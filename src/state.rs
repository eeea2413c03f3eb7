use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;

use crate::config::Config;
use crate::detector::DetectorPool;
use crate::pipeline::FramePipeline;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<FramePipeline>,
    config: Arc<Config>,
    shutdown_tx: broadcast::Sender<()>,
    started_at: Instant,
}

impl AppState {
    pub fn new(pipeline: Arc<FramePipeline>, config: &Config, shutdown_tx: broadcast::Sender<()>) -> Self {
        Self {
            pipeline,
            config: Arc::new(config.clone()),
            shutdown_tx,
            started_at: Instant::now(),
        }
    }

    pub fn pipeline(&self) -> &FramePipeline {
        &self.pipeline
    }

    pub fn detector_pool(&self) -> &Arc<DetectorPool> {
        self.pipeline.detector_pool()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shutdown_rx(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
