//! ONNX face-mesh adapter.
//!
//! Runs a MediaPipe-style face mesh model through ONNX Runtime: the frame
//! is resized to the model's 192x192 input, normalized to [-1, 1] CHW, and
//! the (468, 3) output is returned as normalized (x, y) landmarks. Session
//! construction is the expensive part and happens once per pool slot.

use std::path::{Path, PathBuf};

use image::{imageops, RgbImage};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{Tensor, Value};

use crate::detector::{DetectorError, LandmarkDetector};

/// Model input edge length in pixels.
pub const MESH_INPUT_SIZE: u32 = 192;

pub struct FaceMeshDetector {
    session: Option<Session>,
    model_path: PathBuf,
    min_confidence: f32,
}

impl std::fmt::Debug for FaceMeshDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceMeshDetector")
            .field("model_path", &self.model_path)
            .field("min_confidence", &self.min_confidence)
            .finish()
    }
}

impl FaceMeshDetector {
    /// Build an inference session from an ONNX face-mesh model on disk.
    pub fn load(model_path: &Path, min_confidence: f32) -> Result<Self, DetectorError> {
        if !model_path.exists() {
            return Err(DetectorError::ModelLoad(format!(
                "face mesh model not found at {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| DetectorError::ModelLoad(format!("session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| DetectorError::ModelLoad(format!("optimization level: {e}")))?
            .commit_from_file(model_path)
            .map_err(|e| DetectorError::ModelLoad(format!("load model: {e}")))?;

        tracing::info!(path = %model_path.display(), "face mesh model loaded");

        Ok(Self {
            session: Some(session),
            model_path: model_path.to_path_buf(),
            min_confidence,
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl LandmarkDetector for FaceMeshDetector {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<Vec<(f32, f32)>>, DetectorError> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| DetectorError::Inference("session already released".to_string()))?;

        let tensor = chw_tensor(frame)?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| DetectorError::Inference(format!("run: {e}")))?;

        // The attention variant of the model exports a face-presence logit
        // alongside the landmarks; honor it when present.
        if let Some(flag) = outputs.get("conv_faceflag") {
            if let Ok((_, data)) = flag.try_extract_tensor::<f32>() {
                if let Some(&logit) = data.first() {
                    if sigmoid(logit) < self.min_confidence {
                        return Ok(Vec::new());
                    }
                }
            }
        }

        let output = outputs
            .get("output")
            .ok_or_else(|| DetectorError::Inference("model returned no landmark output".to_string()))?;

        let landmarks = extract_normalized_landmarks(output)?;
        Ok(vec![landmarks])
    }

    fn release(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!(path = %self.model_path.display(), "face mesh session released");
        }
    }
}

/// Resize to the model input and normalize to a [-1, 1] CHW tensor.
fn chw_tensor(frame: &RgbImage) -> Result<Value, DetectorError> {
    let resized = imageops::resize(
        frame,
        MESH_INPUT_SIZE,
        MESH_INPUT_SIZE,
        imageops::FilterType::Triangle,
    );

    let side = MESH_INPUT_SIZE as usize;
    let mut chw = Vec::with_capacity(3 * side * side);
    for c in 0..3 {
        for y in 0..side {
            for x in 0..side {
                let v = resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0;
                chw.push(v * 2.0 - 1.0);
            }
        }
    }

    Tensor::from_array((vec![1usize, 3, side, side], chw.into_boxed_slice()))
        .map(Value::from)
        .map_err(|e| DetectorError::Inference(format!("input tensor: {e}")))
}

/// Parse the landmark tensor, accepting `[1, N, 3]` or `[N, 3]`, into
/// normalized (x, y) pairs.
fn extract_normalized_landmarks(output: &Value) -> Result<Vec<(f32, f32)>, DetectorError> {
    let (shape, data) = output
        .try_extract_tensor::<f32>()
        .map_err(|e| DetectorError::Inference(format!("output tensor: {e}")))?;

    let (points, stride) = match shape.len() {
        3 if shape[0] == 1 => (shape[1] as usize, shape[2] as usize),
        2 => (shape[0] as usize, shape[1] as usize),
        _ => {
            return Err(DetectorError::Inference(format!(
                "unexpected landmark output shape: {shape:?}"
            )))
        }
    };

    if stride < 2 || data.len() < points * stride {
        return Err(DetectorError::Inference(
            "landmark output too small for (x, y) coordinates".to_string(),
        ));
    }

    let mut landmarks = Vec::with_capacity(points);
    for i in 0..points {
        let base = i * stride;
        landmarks.push((data[base], data[base + 1]));
    }
    Ok(landmarks)
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
