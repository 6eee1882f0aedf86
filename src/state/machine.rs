//! Core control state machine
//!
//! Debounces fist verdicts into mute toggles and maps pinch distance to
//! volume while unmuted. Pure: it only decides which commands the audio
//! sink should receive.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::gesture::GestureVerdict;

use super::volume::VolumeMapper;

/// Consecutive fist frames needed to toggle mute
pub const FIST_TOGGLE_FRAMES: u32 = 10;

/// Mute mode of the controlled output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Pinch controls the volume
    Unmuted,
    /// Output muted, pinch ignored
    Muted,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Unmuted
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Unmuted => write!(f, "Unmuted"),
            Mode::Muted => write!(f, "Muted"),
        }
    }
}

/// A request for the audio sink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Command {
    SetMute(bool),
    /// Normalized level in `[0, 1]`
    SetVolumeScalar(f32),
    /// Level in the sink's decibel range
    SetVolumeDb(f32),
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::SetMute(muted) => write!(f, "SetMute({})", muted),
            Command::SetVolumeScalar(scalar) => write!(f, "SetVolumeScalar({:.3})", scalar),
            Command::SetVolumeDb(db) => write!(f, "SetVolumeDb({:.2})", db),
        }
    }
}

/// Commands produced by one update, in the order they must be applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlCommands(Vec<Command>);

impl ControlCommands {
    fn push(&mut self, command: Command) {
        self.0.push(command);
    }

    pub fn as_slice(&self) -> &[Command] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl IntoIterator for ControlCommands {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// State carried across frames for the whole session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlState {
    pub mode: Mode,
    /// Volume scalar saved by the most recent mute; never cleared once set
    pub last_volume_scalar: Option<f32>,
    /// Consecutive fist frames since the last toggle or open hand
    pub fist_streak: u32,
    /// The last unmute restore was rejected and must be re-sent
    pub restore_pending: bool,
}

impl ControlState {
    pub fn is_muted(&self) -> bool {
        self.mode == Mode::Muted
    }
}

/// Maps gesture verdicts to audio commands
pub struct ControlStateMachine {
    state: ControlState,
    mapper: VolumeMapper,
    /// State before the toggle of the current frame, for rollback
    checkpoint: Option<ControlState>,
    /// Most recent volume the sink accepted, for display
    volume_percent: Option<f32>,
    /// `volume_percent` before the current frame, for rollback
    previous_percent: Option<f32>,
}

impl ControlStateMachine {
    /// Create a state machine starting unmuted with no saved volume
    pub fn new(mapper: VolumeMapper) -> Self {
        Self {
            state: ControlState::default(),
            mapper,
            checkpoint: None,
            volume_percent: None,
            previous_percent: None,
        }
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Last volume set from a pinch, truncated to a whole percent
    pub fn volume_percent(&self) -> Option<u8> {
        self.volume_percent.map(|p| p as u8)
    }

    /// Whether `update` with this verdict completes a fist streak
    pub fn will_toggle(&self, verdict: &GestureVerdict) -> bool {
        verdict.is_fist && self.state.fist_streak + 1 >= FIST_TOGGLE_FRAMES
    }

    /// Whether a toggle now would capture the current volume
    ///
    /// False while a rejected restore is outstanding: the saved value is
    /// kept so the next unmute can retry it.
    pub fn wants_capture(&self) -> bool {
        self.state.mode == Mode::Unmuted && !self.state.restore_pending
    }

    /// Advance one frame
    ///
    /// `current_scalar` is the sink's volume at this frame, needed only when
    /// the update mutes; `None` keeps any previously saved value.
    pub fn update(&mut self, verdict: &GestureVerdict, current_scalar: Option<f32>) -> ControlCommands {
        let mut commands = ControlCommands::default();
        self.checkpoint = None;
        self.previous_percent = self.volume_percent;

        if verdict.is_fist {
            self.state.fist_streak += 1;
            if self.state.fist_streak >= FIST_TOGGLE_FRAMES {
                self.state.fist_streak = 0;
                self.toggle(current_scalar, &mut commands);
            }
        } else {
            self.state.fist_streak = 0;
        }

        if self.state.mode == Mode::Unmuted && !verdict.is_fist {
            let percent = self.mapper.percent(verdict.pinch_distance);
            let db = self.mapper.to_db(percent);
            self.volume_percent = Some(percent);
            commands.push(Command::SetVolumeDb(db));
        }

        commands
    }

    /// Undo what a command rejected by the sink implied
    pub fn rollback(&mut self, command: &Command) {
        match command {
            Command::SetMute(_) => {
                if let Some(previous) = self.checkpoint.take() {
                    info!(
                        from = %self.state.mode,
                        to = %previous.mode,
                        "mute toggle rolled back"
                    );
                    self.state = previous;
                }
            }
            Command::SetVolumeScalar(scalar) => {
                debug!(scalar, "volume restore pending retry");
                self.state.restore_pending = true;
            }
            Command::SetVolumeDb(db) => {
                debug!(db, "volume change rolled back");
                self.volume_percent = self.previous_percent;
            }
        }
    }

    fn toggle(&mut self, current_scalar: Option<f32>, commands: &mut ControlCommands) {
        self.checkpoint = Some(self.state.clone());

        match self.state.mode {
            Mode::Unmuted => {
                if self.wants_capture() {
                    if let Some(scalar) = current_scalar {
                        self.state.last_volume_scalar = Some(scalar);
                    }
                }
                commands.push(Command::SetMute(true));
                self.state.mode = Mode::Muted;
            }
            Mode::Muted => {
                commands.push(Command::SetMute(false));
                if let Some(scalar) = self.state.last_volume_scalar {
                    commands.push(Command::SetVolumeScalar(scalar));
                    self.state.restore_pending = false;
                }
                self.state.mode = Mode::Unmuted;
            }
        }

        info!(
            to = %self.state.mode,
            saved_volume = ?self.state.last_volume_scalar,
            "mute toggled"
        );
    }
}
