//! Frame record wire format
//!
//! One JSON object per line:
//! `{"width":640,"height":480,"hands":[[{"id":0,"x":0.41,"y":0.83}, ...]]}`

use serde::{Deserialize, Serialize};

use crate::landmarks::{Frame, FrameSize, HandObservation, Keypoint, ObservationError};

/// Raw detector output for one camera frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Detected hands; only the first is used
    #[serde(default)]
    pub hands: Vec<Vec<Keypoint>>,
}

impl FrameRecord {
    /// Validate into a frame, filling in missing geometry from `default_size`
    pub fn into_frame(self, default_size: FrameSize) -> Result<Frame, ObservationError> {
        let size = FrameSize::new(
            self.width.unwrap_or(default_size.width),
            self.height.unwrap_or(default_size.height),
        );

        let hand = match self.hands.into_iter().next() {
            Some(keypoints) => Some(HandObservation::new(keypoints)?),
            None => None,
        };

        Ok(Frame { size, hand })
    }
}

/// Parse one input line; blank lines carry no record
pub fn parse_line(line: &str) -> Result<Option<FrameRecord>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}
