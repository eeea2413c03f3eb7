//! EAR / MAR ratio extraction.
//!
//! EAR = (|p2-p6| + |p3-p5|) / (2 * |p1-p4|)
//! MAR = |top-bottom| / |left-right|
//!
//! The extractors only turn landmark geometry into ratios; thresholds and
//! scoring policy live in [`crate::engagement::scorer`].

use crate::engagement::landmarks::{EyeIndices, FaceLandmarks, MouthIndices, LEFT_EYE, RIGHT_EYE};

/// EAR for a single eye. A zero horizontal distance signals a degenerate
/// or failed detection and yields 0.0 instead of a division fault.
pub fn eye_aspect_ratio(landmarks: &FaceLandmarks, eye: &EyeIndices) -> f64 {
    let [p1, p2, p3, p4, p5, p6] = eye.0.map(|i| landmarks.point(i));

    let horizontal = p1.distance(&p4);
    if horizontal == 0.0 {
        return 0.0;
    }

    (p2.distance(&p6) + p3.distance(&p5)) / (2.0 * horizontal)
}

/// A face's EAR: the arithmetic mean of the left and right eye.
pub fn combined_eye_aspect_ratio(landmarks: &FaceLandmarks) -> f64 {
    let left = eye_aspect_ratio(landmarks, &LEFT_EYE);
    let right = eye_aspect_ratio(landmarks, &RIGHT_EYE);
    (left + right) / 2.0
}

/// Simplified MAR: vertical over horizontal mouth distance, guarded to
/// 0.0 when the mouth corners coincide.
pub fn mouth_aspect_ratio(landmarks: &FaceLandmarks, mouth: &MouthIndices) -> f64 {
    let left = landmarks.point(mouth.left);
    let right = landmarks.point(mouth.right);
    let top = landmarks.point(mouth.top);
    let bottom = landmarks.point(mouth.bottom);

    let horizontal = left.distance(&right);
    if horizontal == 0.0 {
        return 0.0;
    }

    top.distance(&bottom) / horizontal
}
