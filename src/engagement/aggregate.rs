//! Frame-level aggregation of per-face metrics.

use serde::Serialize;

use crate::engagement::scorer::{round1, FaceMetrics};

/// Overall value emitted when no face was detected in the frame.
///
/// Deliberately outside the [0, 100] score range: "nobody visible" must
/// stay distinguishable from "someone visible but fully disengaged"
/// (which scores 0.0). Frame-sampling clients branch on this value, so it
/// is part of the wire contract.
pub const NO_FACE_SENTINEL: f64 = 200.0;

/// Aggregate outcome for one frame. Built once per submission and
/// discarded after the response; no state survives across frames.
#[derive(Debug, Clone, Serialize)]
pub struct FrameAnalysis {
    pub faces: Vec<FaceMetrics>,
    pub overall_concentration: f64,
}

impl FrameAnalysis {
    pub fn from_faces(faces: Vec<FaceMetrics>) -> Self {
        let overall_concentration = overall_concentration(&faces);
        Self {
            faces,
            overall_concentration,
        }
    }

    pub fn no_faces(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Reduce per-face metrics to the frame's overall engagement value.
///
/// Uses the mean of the 0.7/0.3-weighted `score` field, rounded to one
/// decimal. The per-face `concentration` field (0.8/0.2 weighting) is
/// reported but intentionally not aggregated, mirroring the observed
/// behavior this service replaces.
pub fn overall_concentration(faces: &[FaceMetrics]) -> f64 {
    if faces.is_empty() {
        return NO_FACE_SENTINEL;
    }

    let mean = faces.iter().map(|f| f.score).sum::<f64>() / faces.len() as f64;
    round1(mean)
}
