//! Frame submission endpoint.

use axum::extract::State;
use axum::Json;
use base64::Engine;
use serde::Deserialize;

use crate::response::FrameResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FrameIn {
    /// Data URL ("data:image/jpeg;base64,....") or raw base64.
    pub frame: String,
}

pub async fn root_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Engagement tracking backend is running."
    }))
}

/// `POST /process_frame`
///
/// Decodes the submitted frame and runs the engagement pipeline. Every
/// failure past JSON parsing is reported in-band as `status: "error"`;
/// the endpoint stays available for the caller's next sample either way.
pub async fn process_frame(
    State(state): State<AppState>,
    Json(payload): Json<FrameIn>,
) -> Json<FrameResponse> {
    let encoded = strip_data_url(&payload.frame);
    let bytes = match base64::engine::general_purpose::STANDARD.decode(encoded.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting frame with invalid base64");
            return Json(FrameResponse::error(format!("invalid base64 frame: {e}")));
        }
    };

    match state.pipeline().process_image(&bytes).await {
        Ok(analysis) => {
            tracing::debug!(
                faces = analysis.faces.len(),
                overall = analysis.overall_concentration,
                "frame processed"
            );
            Json(FrameResponse::ok(analysis))
        }
        Err(e) => {
            tracing::warn!(error = %e, "frame processing failed");
            Json(FrameResponse::error(e.to_string()))
        }
    }
}

/// Strip a data-URL header if present: everything up to and including the
/// first comma.
fn strip_data_url(frame: &str) -> &str {
    match frame.split_once(',') {
        Some((_, encoded)) => encoded,
        None => frame,
    }
}
