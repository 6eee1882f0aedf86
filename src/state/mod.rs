//! Control state machine
//!
//! Two modes and one debounce counter:
//! - Unmuted: pinch distance drives the volume
//! - Muted: pinch ignored, pre-mute volume saved for restore
//! - fist_streak: consecutive fist frames; a full streak toggles the mode

mod machine;
mod volume;

pub use machine::{Command, ControlStateMachine, Mode};
pub use volume::{RangeError, VolumeMapper, VolumeRange};
