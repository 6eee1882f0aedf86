//! Audio output boundary

use crate::state::{Command, VolumeRange};

/// Errors reported by an audio sink
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SinkError {
    #[error("audio device unavailable")]
    DeviceUnavailable,

    #[error("volume scalar {0} outside 0..=1")]
    ScalarOutOfRange(f32),

    #[error("volume {db} dB outside {min_db}..={max_db} dB")]
    DbOutOfRange { db: f32, min_db: f32, max_db: f32 },
}

/// The output device volume and mute are applied to
pub trait AudioSink: Send {
    /// Native decibel range of the device
    fn volume_range(&self) -> Result<VolumeRange, SinkError>;

    /// Current level as a normalized scalar in `[0, 1]`
    fn volume_scalar(&self) -> Result<f32, SinkError>;

    fn set_volume_scalar(&mut self, scalar: f32) -> Result<(), SinkError>;

    fn set_volume_db(&mut self, db: f32) -> Result<(), SinkError>;

    fn set_mute(&mut self, muted: bool) -> Result<(), SinkError>;

    /// Apply one state machine command
    fn apply(&mut self, command: &Command) -> Result<(), SinkError> {
        match *command {
            Command::SetMute(muted) => self.set_mute(muted),
            Command::SetVolumeScalar(scalar) => self.set_volume_scalar(scalar),
            Command::SetVolumeDb(db) => self.set_volume_db(db),
        }
    }
}
