//! Landmark detector boundary.
//!
//! Detection is an external collaborator: an expensive-to-construct model
//! that turns an RGB frame into per-face normalized landmark sequences.
//! The [`LandmarkDetector`] trait is the contract; [`DetectorPool`] owns
//! the instances and is the only concurrency-control point — detector
//! implementations are not assumed safe for unsynchronized shared use.

pub mod face_mesh;

use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbImage;
use thiserror::Error;
use tokio::sync::{Mutex, Semaphore};

pub use face_mesh::FaceMeshDetector;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("failed to load landmark model: {0}")]
    ModelLoad(String),
    #[error("landmark inference failed: {0}")]
    Inference(String),
    #[error("detector pool is closed")]
    Closed,
}

/// One landmark model instance.
///
/// `detect` returns, per detected face, an ordered sequence of normalized
/// (x, y) coordinates following the 468-point mesh index scheme. An empty
/// vector means no face was visible; that is not an error.
pub trait LandmarkDetector: Send {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Vec<(f32, f32)>>, DetectorError>;

    /// Release underlying resources. Called exactly once by the pool at
    /// shutdown; implementations must tolerate repeated calls.
    fn release(&mut self) {}
}

/// Fixed-size checkout pool of detector instances.
///
/// Each in-flight request checks out one instance; when all are busy the
/// caller waits, which is the service's backpressure point. Inference runs
/// on the blocking thread pool so detection latency never stalls the
/// async executor.
pub struct DetectorPool {
    instances: Mutex<Vec<Box<dyn LandmarkDetector>>>,
    slots: Semaphore,
    size: usize,
    closed: AtomicBool,
}

impl DetectorPool {
    pub fn new(instances: Vec<Box<dyn LandmarkDetector>>) -> Self {
        let size = instances.len();
        Self {
            instances: Mutex::new(instances),
            slots: Semaphore::new(size),
            size,
            closed: AtomicBool::new(false),
        }
    }

    /// Number of instances the pool was built with.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Check out an instance, run detection on the blocking pool, return
    /// the instance.
    pub async fn detect(&self, frame: RgbImage) -> Result<Vec<Vec<(f32, f32)>>, DetectorError> {
        let permit = self
            .slots
            .acquire()
            .await
            .map_err(|_| DetectorError::Closed)?;

        let mut detector = {
            let mut instances = self.instances.lock().await;
            instances.pop().ok_or(DetectorError::Closed)?
        };

        match tokio::task::spawn_blocking(move || {
            let result = detector.detect(&frame);
            (detector, result)
        })
        .await
        {
            Ok((mut detector, result)) => {
                if self.is_closed() {
                    // Pool was closed while this request was in flight;
                    // the drain in close() never saw this instance.
                    detector.release();
                } else {
                    self.instances.lock().await.push(detector);
                }
                drop(permit);
                result
            }
            Err(join_err) => {
                // The instance is gone with the panicked task; shrink the
                // pool instead of handing out a missing slot.
                permit.forget();
                Err(DetectorError::Inference(format!(
                    "detector task failed: {join_err}"
                )))
            }
        }
    }

    /// Release every pooled instance. Idempotent: later calls, and calls
    /// after a partially failed initialization, are no-ops.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.slots.close();

        let mut instances = self.instances.lock().await;
        let count = instances.len();
        for detector in instances.iter_mut() {
            detector.release();
        }
        instances.clear();
        tracing::info!(count, "detector pool released");
    }
}
