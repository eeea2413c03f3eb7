//! Frame processing pipeline: decoded image in, aggregated engagement out.

use std::sync::Arc;

use image::RgbImage;
use thiserror::Error;

use crate::detector::{DetectorError, DetectorPool};
use crate::engagement::{score_face, FaceLandmarks, FrameAnalysis, ScoringConfig};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid image data: {0}")]
    Decode(String),
    #[error(transparent)]
    Detector(#[from] DetectorError),
}

/// Orchestrates one frame submission: decode, downscale, detect, score,
/// aggregate. Owns no per-frame state; the only shared resource is the
/// injected detector pool.
pub struct FramePipeline {
    pool: Arc<DetectorPool>,
    scoring: ScoringConfig,
    max_width: u32,
}

impl FramePipeline {
    pub fn new(pool: Arc<DetectorPool>, scoring: ScoringConfig, max_width: u32) -> Self {
        Self {
            pool,
            scoring,
            max_width,
        }
    }

    pub fn detector_pool(&self) -> &Arc<DetectorPool> {
        &self.pool
    }

    /// Process one encoded frame.
    ///
    /// Decode failures and detector faults surface as [`PipelineError`];
    /// an empty frame (no face) is a normal outcome carrying the no-face
    /// sentinel in the returned analysis.
    pub async fn process_image(&self, bytes: &[u8]) -> Result<FrameAnalysis, PipelineError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| PipelineError::Decode(e.to_string()))?
            .to_rgb8();
        let frame = downscale_to_width(decoded, self.max_width);
        let (width, height) = frame.dimensions();

        let detections = self.pool.detect(frame).await?;

        let mut faces = Vec::with_capacity(detections.len());
        for (index, normalized) in detections.iter().enumerate() {
            match FaceLandmarks::from_normalized(normalized, width, height) {
                Ok(landmarks) => faces.push(score_face(&landmarks, &self.scoring)),
                Err(e) => {
                    // Degenerate detection; drop the face, keep the frame.
                    tracing::warn!(face = index, error = %e, "skipping malformed landmark set");
                }
            }
        }

        let analysis = FrameAnalysis::from_faces(faces);
        if analysis.no_faces() {
            tracing::debug!("no face detected in frame");
        }
        Ok(analysis)
    }
}

/// Cap the frame width before detection, preserving aspect ratio.
///
/// Large captures cost detection latency without improving landmark
/// quality, so anything wider than `max_width` is shrunk with
/// area-averaging (box filter) resampling.
pub(crate) fn downscale_to_width(frame: RgbImage, max_width: u32) -> RgbImage {
    let (width, height) = frame.dimensions();
    if width <= max_width || max_width == 0 {
        return frame;
    }

    let scale = f64::from(max_width) / f64::from(width);
    let new_height = ((f64::from(height) * scale).trunc() as u32).max(1);
    tracing::debug!(from = width, to = max_width, "downscaling frame");
    image::imageops::thumbnail(&frame, max_width, new_height)
}
