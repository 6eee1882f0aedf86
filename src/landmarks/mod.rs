//! Hand landmark data model
//!
//! Normalized keypoints as produced by an external hand-landmark detector,
//! validated into a fixed 21-point `HandObservation` at the boundary.

mod hand;

pub use hand::{Frame, FrameSize, HandObservation, Keypoint, ObservationError, LANDMARK_COUNT};

/// Landmark ids of the 21-point hand model
pub mod ids {
    pub const WRIST: usize = 0;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_PIP: usize = 14;
    pub const RING_TIP: usize = 16;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_TIP: usize = 20;
}
