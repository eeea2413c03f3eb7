//! Wire-level response shapes.
//!
//! The frame endpoint reports outcomes in-band: every reply is HTTP 200
//! with a `status` discriminant, because the frame-sampling clients this
//! service replaces poll it in a loop and branch on the body, not on HTTP
//! status codes. Transport-level failures (oversized body, malformed
//! JSON) are still wrapped into the same shape by the request-id
//! middleware.

use serde::Serialize;

use crate::engagement::{FaceMetrics, FrameAnalysis};

/// Body of `POST /process_frame`.
#[derive(Debug, Serialize)]
pub struct FrameResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faces: Option<Vec<FaceMetrics>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_concentration: Option<f64>,
}

impl FrameResponse {
    pub fn ok(analysis: FrameAnalysis) -> Self {
        let faces = if analysis.no_faces() {
            // No-face path: the sentinel overall value stands alone.
            None
        } else {
            Some(analysis.faces)
        };
        Self {
            status: "ok",
            message: None,
            faces,
            overall_concentration: Some(analysis.overall_concentration),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: Some(message.into()),
            faces: None,
            overall_concentration: None,
        }
    }
}

/// Error body used by middleware when a failure happens outside the frame
/// handler (body limit, JSON rejection, panic recovery).
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ErrorBody {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            status: "error",
            code: code.to_string(),
            message: message.into(),
            trace_id: None,
        }
    }
}
