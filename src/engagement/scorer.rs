//! Per-face attentiveness scoring.
//!
//! Turns (EAR, MAR) into a bounded score plus threshold flags. Two
//! weightings are exposed: `score` (0.7 eye / 0.3 yawn) drives the frame
//! aggregate, `concentration` (0.8 / 0.2) is the stricter eye-weighted
//! variant some callers prefer.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::engagement::landmarks::{FaceLandmarks, MOUTH};
use crate::engagement::ratios::{combined_eye_aspect_ratio, mouth_aspect_ratio};

const SCORE_BLINK_WEIGHT: f64 = 0.7;
const SCORE_YAWN_WEIGHT: f64 = 0.3;
const CONCENTRATION_BLINK_WEIGHT: f64 = 0.8;
const CONCENTRATION_YAWN_WEIGHT: f64 = 0.2;

/// Scoring thresholds. EAR below `ear_thresh` reads as closing eyes, MAR
/// above `mar_thresh` as a yawn.
#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    pub ear_thresh: f64,
    pub mar_thresh: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ear_thresh: 0.21,
            mar_thresh: 0.60,
        }
    }
}

/// Pixel-space face bounding box with x1 <= x2 and y1 <= y2.
///
/// Serializes as `[x1, y1, x2, y2]`, the shape frame-sampling clients
/// already consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(4))?;
        for v in [self.x1, self.y1, self.x2, self.y2] {
            seq.serialize_element(&v)?;
        }
        seq.end()
    }
}

/// Per-face result for one frame. Constructed fresh per face, never
/// mutated, dropped once the response is sent.
#[derive(Debug, Clone, Serialize)]
pub struct FaceMetrics {
    pub bbox: BoundingBox,
    pub ear: f64,
    pub mar: f64,
    pub score: f64,
    pub concentration: f64,
    pub eyes_closed: bool,
    pub yawning: bool,
}

/// Continuous outputs of the scoring policy, full precision.
#[derive(Debug, Clone, Copy)]
pub struct RatioScores {
    pub score: f64,
    pub concentration: f64,
    pub eyes_closed: bool,
    pub yawning: bool,
}

/// Apply the threshold/penalty policy to a pair of ratios.
///
/// Both outputs are clamped to [0, 100]. Total over all finite inputs.
pub fn score_ratios(ear: f64, mar: f64, config: &ScoringConfig) -> RatioScores {
    let ear_denom = if config.ear_thresh > 0.0 {
        config.ear_thresh
    } else {
        1e-6
    };
    let blink_penalty = ((config.ear_thresh - ear) / ear_denom).clamp(0.0, 1.0);
    let yawn_penalty = if mar > config.mar_thresh { 1.0 } else { 0.0 };

    let score = (100.0
        * (1.0 - (SCORE_BLINK_WEIGHT * blink_penalty + SCORE_YAWN_WEIGHT * yawn_penalty)))
        .clamp(0.0, 100.0);
    let concentration = (100.0
        * (1.0
            - (CONCENTRATION_BLINK_WEIGHT * blink_penalty
                + CONCENTRATION_YAWN_WEIGHT * yawn_penalty)))
        .clamp(0.0, 100.0);

    RatioScores {
        score,
        concentration,
        eyes_closed: ear < config.ear_thresh,
        yawning: mar > config.mar_thresh,
    }
}

/// Score one face: extract ratios, apply the policy, compute the bounding
/// box. Rounds for external consumption (ratios to 3 dp, scores to 1 dp);
/// the math above runs at full precision.
pub fn score_face(landmarks: &FaceLandmarks, config: &ScoringConfig) -> FaceMetrics {
    let ear = combined_eye_aspect_ratio(landmarks);
    let mar = mouth_aspect_ratio(landmarks, &MOUTH);
    tracing::debug!(ear, mar, "face ratios");

    let scores = score_ratios(ear, mar, config);

    FaceMetrics {
        bbox: bounding_box(landmarks),
        ear: round3(ear),
        mar: round3(mar),
        score: round1(scores.score),
        concentration: round1(scores.concentration),
        eyes_closed: scores.eyes_closed,
        yawning: scores.yawning,
    }
}

/// Min/max of all landmark coordinates, truncated to integers.
fn bounding_box(landmarks: &FaceLandmarks) -> BoundingBox {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for p in landmarks.iter() {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    BoundingBox {
        x1: min_x.trunc() as i32,
        y1: min_y.trunc() as i32,
        x2: max_x.trunc() as i32,
        y2: max_y.trunc() as i32,
    }
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub(crate) fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
