//! Events module for control state changes
//!
//! Emitted by the session once the audio sink has accepted (or rejected)
//! the commands of a frame.

use serde::{Deserialize, Serialize};

use crate::state::Command;

/// Events broadcast to observers such as an overlay client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlEvent {
    /// A hand appeared after frames without one
    HandDetected,

    /// The tracked hand left the frame
    HandLost,

    /// Output muted by a completed fist streak
    Muted {
        /// Volume scalar saved for the next unmute
        saved_volume: Option<f32>,
    },

    /// Output unmuted by a completed fist streak
    Unmuted,

    /// The pre-mute volume was written back after an unmute
    VolumeRestored { scalar: f32 },

    /// Pinch moved the volume to a new whole percent
    VolumeChanged {
        percent: u8,
        db: f32,
    },

    /// The audio sink refused a command
    CommandFailed {
        command: Command,
        reason: String,
    },
}

impl std::fmt::Display for ControlEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlEvent::HandDetected => write!(f, "HAND_DETECTED"),
            ControlEvent::HandLost => write!(f, "HAND_LOST"),
            ControlEvent::Muted { .. } => write!(f, "MUTED"),
            ControlEvent::Unmuted => write!(f, "UNMUTED"),
            ControlEvent::VolumeRestored { scalar } => {
                write!(f, "VOLUME_RESTORED ({:.3})", scalar)
            }
            ControlEvent::VolumeChanged { percent, .. } => {
                write!(f, "VOLUME_CHANGED ({}%)", percent)
            }
            ControlEvent::CommandFailed { command, reason } => {
                write!(f, "COMMAND_FAILED ({}: {})", command, reason)
            }
        }
    }
}
