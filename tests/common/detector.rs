//! Scripted landmark detectors for driving the pipeline without a model.

use engagement_backend::detector::{DetectorError, LandmarkDetector};
use engagement_backend::engagement::landmarks::{
    EyeIndices, MouthIndices, LEFT_EYE, MESH_LANDMARK_COUNT, MOUTH, RIGHT_EYE,
};
use image::RgbImage;

/// Returns the same faces for every frame.
pub struct ScriptedDetector {
    faces: Vec<Vec<(f32, f32)>>,
}

impl ScriptedDetector {
    pub fn with_faces(faces: Vec<Vec<(f32, f32)>>) -> Self {
        Self { faces }
    }

    pub fn no_faces() -> Self {
        Self { faces: Vec::new() }
    }
}

impl LandmarkDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<Vec<(f32, f32)>>, DetectorError> {
        Ok(self.faces.clone())
    }
}

/// Always fails, standing in for a broken model runtime.
pub struct FailingDetector;

impl LandmarkDetector for FailingDetector {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<Vec<(f32, f32)>>, DetectorError> {
        Err(DetectorError::Inference(
            "landmark model rejected the frame".to_string(),
        ))
    }
}

fn set_eye(points: &mut [(f32, f32)], eye: &EyeIndices, coords: [(f32, f32); 6]) {
    for (slot, xy) in eye.0.iter().zip(coords) {
        points[*slot] = xy;
    }
}

fn set_mouth(points: &mut [(f32, f32)], mouth: &MouthIndices, vertical_span: f32) {
    points[mouth.left] = (0.40, 0.70);
    points[mouth.right] = (0.60, 0.70);
    points[mouth.top] = (0.50, 0.70 - vertical_span / 2.0);
    points[mouth.bottom] = (0.50, 0.70 + vertical_span / 2.0);
}

/// A full normalized mesh with wide-open eyes and a closed mouth:
/// scores 100 under the default thresholds.
pub fn open_face() -> Vec<(f32, f32)> {
    let mut points = vec![(0.5f32, 0.5f32); MESH_LANDMARK_COUNT];
    set_eye(
        &mut points,
        &LEFT_EYE,
        [
            (0.30, 0.50),
            (0.32, 0.47),
            (0.38, 0.47),
            (0.40, 0.50),
            (0.38, 0.53),
            (0.32, 0.53),
        ],
    );
    set_eye(
        &mut points,
        &RIGHT_EYE,
        [
            (0.60, 0.50),
            (0.62, 0.47),
            (0.68, 0.47),
            (0.70, 0.50),
            (0.68, 0.53),
            (0.62, 0.53),
        ],
    );
    set_mouth(&mut points, &MOUTH, 0.04);
    points
}

/// Closed eyes (EAR 0) plus a wide-open mouth: scores 0.
pub fn drowsy_face() -> Vec<(f32, f32)> {
    let mut points = vec![(0.5f32, 0.5f32); MESH_LANDMARK_COUNT];
    set_eye(
        &mut points,
        &LEFT_EYE,
        [
            (0.30, 0.50),
            (0.32, 0.50),
            (0.38, 0.50),
            (0.40, 0.50),
            (0.38, 0.50),
            (0.32, 0.50),
        ],
    );
    set_eye(
        &mut points,
        &RIGHT_EYE,
        [
            (0.60, 0.50),
            (0.62, 0.50),
            (0.68, 0.50),
            (0.70, 0.50),
            (0.68, 0.50),
            (0.62, 0.50),
        ],
    );
    set_mouth(&mut points, &MOUTH, 0.30);
    points
}
