//! Keypoints, hand observations and frame geometry

use serde::{Deserialize, Serialize};

/// Number of landmarks in a single hand observation
pub const LANDMARK_COUNT: usize = 21;

/// A single normalized landmark position
///
/// `x` and `y` are in `[0, 1]` with the origin at the top-left corner of the
/// frame and `y` growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Landmark id (0 = wrist, 4 = thumb tip, 8 = index tip, ...)
    pub id: usize,
    pub x: f32,
    pub y: f32,
}

impl Keypoint {
    pub fn new(id: usize, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

/// Reasons a detector output is rejected before classification
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObservationError {
    #[error("expected 21 keypoints, found {found}")]
    WrongCount { found: usize },

    #[error("unknown landmark id {0}")]
    UnknownLandmark(usize),

    #[error("landmark {0} appears more than once")]
    DuplicateLandmark(usize),

    #[error("landmark {0} is missing")]
    MissingLandmark(usize),

    #[error("landmark {0} has a non-finite coordinate")]
    NonFinite(usize),
}

/// One hand's 21 keypoints, indexed by landmark id
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    keypoints: [Keypoint; LANDMARK_COUNT],
}

impl HandObservation {
    /// Validate detector output into an observation
    ///
    /// Keypoints may arrive in any order; each id in `0..21` must appear
    /// exactly once.
    pub fn new(keypoints: Vec<Keypoint>) -> Result<Self, ObservationError> {
        if keypoints.len() != LANDMARK_COUNT {
            return Err(ObservationError::WrongCount {
                found: keypoints.len(),
            });
        }

        let mut slots: [Option<Keypoint>; LANDMARK_COUNT] = [None; LANDMARK_COUNT];
        for keypoint in keypoints {
            if keypoint.id >= LANDMARK_COUNT {
                return Err(ObservationError::UnknownLandmark(keypoint.id));
            }
            if !keypoint.x.is_finite() || !keypoint.y.is_finite() {
                return Err(ObservationError::NonFinite(keypoint.id));
            }
            let slot = &mut slots[keypoint.id];
            if slot.is_some() {
                return Err(ObservationError::DuplicateLandmark(keypoint.id));
            }
            *slot = Some(keypoint);
        }

        // With 21 entries and no duplicates every slot is filled, but report
        // the first gap rather than relying on that.
        let mut ordered = [Keypoint::new(0, 0.0, 0.0); LANDMARK_COUNT];
        for (id, slot) in slots.iter().enumerate() {
            ordered[id] = slot.ok_or(ObservationError::MissingLandmark(id))?;
        }

        Ok(Self { keypoints: ordered })
    }

    /// Keypoint for a landmark id
    ///
    /// Panics if `id` is not a valid landmark id; use the constants in
    /// [`crate::landmarks::ids`].
    pub fn keypoint(&self, id: usize) -> &Keypoint {
        &self.keypoints[id]
    }
}

/// A landmark position in whole-pixel frame coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    pub fn distance_to(&self, other: &PixelPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Dimensions of the camera frame the keypoints were detected in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl Default for FrameSize {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Denormalize a keypoint, truncating to the pixel it falls in
    pub fn to_pixels(&self, keypoint: &Keypoint) -> PixelPoint {
        PixelPoint {
            x: (keypoint.x * self.width as f32).trunc(),
            y: (keypoint.y * self.height as f32).trunc(),
        }
    }
}

/// A validated input frame: its geometry and the primary hand, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub size: FrameSize,
    pub hand: Option<HandObservation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_hand() -> Vec<Keypoint> {
        (0..LANDMARK_COUNT)
            .map(|id| Keypoint::new(id, 0.5, 0.5))
            .collect()
    }

    #[test]
    fn test_accepts_unordered_keypoints() {
        let mut keypoints = full_hand();
        keypoints.reverse();
        keypoints[0].x = 0.9; // id 20

        let hand = HandObservation::new(keypoints).unwrap();
        assert_eq!(hand.keypoint(20).x, 0.9);
        assert_eq!(hand.keypoint(0).id, 0);
    }

    #[test]
    fn test_rejects_wrong_count() {
        let mut keypoints = full_hand();
        keypoints.pop();
        assert_eq!(
            HandObservation::new(keypoints),
            Err(ObservationError::WrongCount { found: 20 })
        );
        assert_eq!(
            HandObservation::new(Vec::new()),
            Err(ObservationError::WrongCount { found: 0 })
        );
    }

    #[test]
    fn test_rejects_duplicate_landmark() {
        let mut keypoints = full_hand();
        keypoints[3].id = 7;
        assert_eq!(
            HandObservation::new(keypoints),
            Err(ObservationError::DuplicateLandmark(7))
        );
    }

    #[test]
    fn test_rejects_unknown_landmark() {
        let mut keypoints = full_hand();
        keypoints[20].id = 21;
        assert_eq!(
            HandObservation::new(keypoints),
            Err(ObservationError::UnknownLandmark(21))
        );
    }

    #[test]
    fn test_rejects_nan() {
        let mut keypoints = full_hand();
        keypoints[5].y = f32::NAN;
        assert_eq!(
            HandObservation::new(keypoints),
            Err(ObservationError::NonFinite(5))
        );
    }

    #[test]
    fn test_accepts_degenerate_positions() {
        let keypoints = (0..LANDMARK_COUNT)
            .map(|id| Keypoint::new(id, 0.0, 0.0))
            .collect();
        assert!(HandObservation::new(keypoints).is_ok());
    }

    #[test]
    fn test_to_pixels_truncates() {
        let size = FrameSize::new(640, 480);
        let point = size.to_pixels(&Keypoint::new(4, 0.5012, 0.2509));
        assert_eq!(point, PixelPoint { x: 320.0, y: 120.0 });
    }

    #[test]
    fn test_pixel_distance() {
        let a = PixelPoint { x: 0.0, y: 0.0 };
        let b = PixelPoint { x: 30.0, y: 40.0 };
        assert_eq!(a.distance_to(&b), 50.0);
    }
}
