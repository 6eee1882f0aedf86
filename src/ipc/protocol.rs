//! IPC message protocol definitions
//!
//! All messages are JSON-encoded, prefixed with a 4-byte little-endian length.

use serde::{Deserialize, Serialize};

use crate::events::ControlEvent;
use crate::session::SessionSnapshot;
use crate::state::Mode;

/// Requests from an overlay client to the daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Request current controller status
    GetStatus,

    /// Ping to check connectivity
    Ping,

    /// Subscribe to control event notifications
    Subscribe,
}

/// Responses from daemon to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Current controller status
    Status(ControlStatus),

    /// Pong response to ping
    Pong,

    /// Subscription confirmed
    Subscribed,

    /// Error response
    Error { code: String, message: String },
}

/// Push notification for subscribed clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    ControlEvent { event: ControlEvent },
}

/// Status snapshot an overlay renders from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlStatus {
    /// Daemon version
    pub version: String,

    pub muted: bool,

    /// Last pinch-mapped volume, if any pinch has been seen
    pub volume_percent: Option<u8>,

    /// Progress toward the next mute toggle
    pub fist_streak: u32,

    pub hand_present: bool,

    pub frames_processed: u64,

    /// Uptime in seconds
    pub uptime_secs: u64,
}

impl Default for ControlStatus {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            muted: false,
            volume_percent: None,
            fist_streak: 0,
            hand_present: false,
            frames_processed: 0,
            uptime_secs: 0,
        }
    }
}

impl ControlStatus {
    /// Copy the session-owned fields from a snapshot
    pub fn update_from(&mut self, snapshot: &SessionSnapshot) {
        self.muted = snapshot.mode == Mode::Muted;
        self.volume_percent = snapshot.volume_percent;
        self.fist_streak = snapshot.fist_streak;
        self.hand_present = snapshot.hand_present;
        self.frames_processed = snapshot.frames_processed;
    }
}
