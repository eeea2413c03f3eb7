//! Facial landmark value type and the anatomical index scheme.
//!
//! Landmark identity follows the MediaPipe face-mesh convention: a fixed
//! 468-point mesh (478 when iris refinement is enabled). The ratio
//! extractors address points positionally through the index sets below, so
//! construction validates the sequence length once and everything
//! downstream can index without re-checking.

use thiserror::Error;

use crate::engagement::geometry::Point2D;

/// Landmark count of the standard face mesh.
pub const MESH_LANDMARK_COUNT: usize = 468;
/// Landmark count with iris refinement enabled.
pub const MESH_LANDMARK_COUNT_REFINED: usize = 478;

/// Six eye landmarks ordered p1..p6 for the EAR formula:
/// p1/p4 are the horizontal corners, p2/p6 and p3/p5 the vertical pairs.
#[derive(Debug, Clone, Copy)]
pub struct EyeIndices(pub [usize; 6]);

/// Mouth landmarks for the simplified MAR formula.
#[derive(Debug, Clone, Copy)]
pub struct MouthIndices {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

pub const LEFT_EYE: EyeIndices = EyeIndices([33, 160, 158, 133, 153, 144]);
pub const RIGHT_EYE: EyeIndices = EyeIndices([362, 385, 387, 263, 373, 380]);
pub const MOUTH: MouthIndices = MouthIndices {
    left: 61,
    right: 291,
    top: 13,
    bottom: 14,
};

#[derive(Debug, Error)]
pub enum LandmarkError {
    #[error("unexpected landmark count: got {got}, expected {MESH_LANDMARK_COUNT} or {MESH_LANDMARK_COUNT_REFINED}")]
    UnexpectedCount { got: usize },
}

/// An ordered, length-validated set of landmark points for one face, in
/// pixel coordinates.
#[derive(Debug, Clone)]
pub struct FaceLandmarks {
    points: Vec<Point2D>,
}

impl FaceLandmarks {
    /// Build from detector output: normalized (x, y) in [0, 1], scaled by
    /// the frame dimensions.
    pub fn from_normalized(
        normalized: &[(f32, f32)],
        width: u32,
        height: u32,
    ) -> Result<Self, LandmarkError> {
        let points = normalized
            .iter()
            .map(|&(x, y)| Point2D::new(f64::from(x) * f64::from(width), f64::from(y) * f64::from(height)))
            .collect();
        Self::from_points(points)
    }

    /// Build from points already in pixel space.
    pub fn from_points(points: Vec<Point2D>) -> Result<Self, LandmarkError> {
        match points.len() {
            MESH_LANDMARK_COUNT | MESH_LANDMARK_COUNT_REFINED => Ok(Self { points }),
            got => Err(LandmarkError::UnexpectedCount { got }),
        }
    }

    /// Point at a mesh index. Valid for every index below
    /// [`MESH_LANDMARK_COUNT`] thanks to the construction-time length check.
    pub fn point(&self, index: usize) -> Point2D {
        self.points[index]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.points.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_normalized_scales_by_frame_dimensions() {
        let mut normalized = vec![(0.5f32, 0.5f32); MESH_LANDMARK_COUNT];
        normalized[0] = (0.25, 0.75);

        let lm = FaceLandmarks::from_normalized(&normalized, 640, 480).unwrap();
        assert_eq!(lm.point(0), Point2D::new(160.0, 360.0));
        assert_eq!(lm.point(1), Point2D::new(320.0, 240.0));
    }

    #[test]
    fn accepts_refined_mesh_length() {
        let normalized = vec![(0.1f32, 0.1f32); MESH_LANDMARK_COUNT_REFINED];
        assert!(FaceLandmarks::from_normalized(&normalized, 100, 100).is_ok());
    }

    #[test]
    fn rejects_truncated_sequences() {
        let normalized = vec![(0.1f32, 0.1f32); 42];
        let err = FaceLandmarks::from_normalized(&normalized, 100, 100).unwrap_err();
        assert!(matches!(err, LandmarkError::UnexpectedCount { got: 42 }));
    }

    #[test]
    fn index_constants_fit_the_mesh() {
        let max = LEFT_EYE
            .0
            .iter()
            .chain(RIGHT_EYE.0.iter())
            .copied()
            .chain([MOUTH.left, MOUTH.right, MOUTH.top, MOUTH.bottom])
            .max()
            .unwrap();
        assert!(max < MESH_LANDMARK_COUNT);
    }
}
