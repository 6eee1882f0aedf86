//! Fist and pinch classification from a single hand observation

use crate::landmarks::ids::{
    INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP,
    THUMB_MCP, THUMB_TIP, WRIST,
};
use crate::landmarks::{FrameSize, HandObservation};

/// (tip, mid-joint) pairs of the four non-thumb fingers
const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Normalized x splitting left-side wrists from right-side ones
const HANDEDNESS_SPLIT: f32 = 0.5;

/// Per-frame classifier output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureVerdict {
    /// All four fingers and the thumb are curled
    pub is_fist: bool,
    /// Thumb tip to index tip, in pixels
    pub pinch_distance: f32,
}

/// Classify one hand
///
/// Finger bend is read from normalized coordinates; the pinch distance is
/// measured after denormalizing to `frame`.
pub fn classify(hand: &HandObservation, frame: FrameSize) -> GestureVerdict {
    let is_fist = fingers_bent(hand) && thumb_bent(hand);

    let thumb = frame.to_pixels(hand.keypoint(THUMB_TIP));
    let index = frame.to_pixels(hand.keypoint(INDEX_TIP));

    GestureVerdict {
        is_fist,
        pinch_distance: thumb.distance_to(&index),
    }
}

/// Every fingertip sits below its mid-joint on screen
fn fingers_bent(hand: &HandObservation) -> bool {
    FINGER_JOINTS
        .iter()
        .all(|&(tip, mid)| hand.keypoint(tip).y > hand.keypoint(mid).y)
}

/// Thumb tip folded across its base, mirrored for the hand's side of the frame
fn thumb_bent(hand: &HandObservation) -> bool {
    let tip = hand.keypoint(THUMB_TIP).x;
    let base = hand.keypoint(THUMB_MCP).x;

    if hand.keypoint(WRIST).x < HANDEDNESS_SPLIT {
        tip > base
    } else {
        tip < base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Keypoint, LANDMARK_COUNT};

    /// Hand with every finger curled, the wrist at `wrist_x` and the thumb
    /// tip at `thumb_tip_x` (thumb base fixed at 0.40)
    fn hand(wrist_x: f32, thumb_tip_x: f32) -> HandObservation {
        let mut keypoints: Vec<Keypoint> = (0..LANDMARK_COUNT)
            .map(|id| Keypoint::new(id, 0.45, 0.50))
            .collect();
        keypoints[WRIST].x = wrist_x;
        keypoints[THUMB_MCP].x = 0.40;
        keypoints[THUMB_TIP].x = thumb_tip_x;
        for (tip, mid) in FINGER_JOINTS {
            keypoints[mid].y = 0.50;
            keypoints[tip].y = 0.60;
        }
        HandObservation::new(keypoints).unwrap()
    }

    fn with_point(hand: &HandObservation, id: usize, x: f32, y: f32) -> HandObservation {
        let mut keypoints: Vec<Keypoint> = (0..LANDMARK_COUNT).map(|i| *hand.keypoint(i)).collect();
        keypoints[id] = Keypoint::new(id, x, y);
        HandObservation::new(keypoints).unwrap()
    }

    #[test]
    fn test_fist_left_of_center() {
        let verdict = classify(&hand(0.30, 0.45), FrameSize::default());
        assert!(verdict.is_fist);

        let verdict = classify(&hand(0.30, 0.35), FrameSize::default());
        assert!(!verdict.is_fist);
    }

    #[test]
    fn test_fist_right_of_center_reverses_thumb() {
        let verdict = classify(&hand(0.50, 0.45), FrameSize::default());
        assert!(!verdict.is_fist);

        let verdict = classify(&hand(0.70, 0.35), FrameSize::default());
        assert!(verdict.is_fist);
    }

    #[test]
    fn test_one_extended_finger_is_not_fist() {
        let curled = hand(0.30, 0.45);
        // Ring tip above its mid-joint
        let open = with_point(&curled, RING_TIP, 0.45, 0.40);
        assert!(!classify(&open, FrameSize::default()).is_fist);
    }

    #[test]
    fn test_tip_level_with_joint_is_not_bent() {
        let curled = hand(0.30, 0.45);
        let level = with_point(&curled, PINKY_TIP, 0.45, 0.50);
        assert!(!classify(&level, FrameSize::default()).is_fist);
    }

    #[test]
    fn test_pinch_distance_in_pixels() {
        let base = hand(0.30, 0.45);
        let base = with_point(&base, THUMB_TIP, 0.25, 0.50);
        let pinch = with_point(&base, INDEX_TIP, 0.25, 0.75);

        // 0.25 of a 480px frame height
        let verdict = classify(&pinch, FrameSize::new(640, 480));
        assert_eq!(verdict.pinch_distance, 120.0);

        let verdict = classify(&pinch, FrameSize::new(1280, 960));
        assert_eq!(verdict.pinch_distance, 240.0);
    }

    #[test]
    fn test_clustered_points() {
        let keypoints = (0..LANDMARK_COUNT)
            .map(|id| Keypoint::new(id, 0.5, 0.5))
            .collect();
        let verdict = classify(&HandObservation::new(keypoints).unwrap(), FrameSize::default());
        assert!(!verdict.is_fist);
        assert_eq!(verdict.pinch_distance, 0.0);
    }
}
