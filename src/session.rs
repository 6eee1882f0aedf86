//! Per-frame control session
//!
//! Owns the state machine and the audio sink for the lifetime of the
//! process. Each frame runs classify → update → apply, rolling the state
//! machine back for any command the sink rejects.

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::audio::{AudioSink, SinkError};
use crate::events::ControlEvent;
use crate::gesture::{self, GestureVerdict};
use crate::landmarks::{Frame, FrameSize, ObservationError};
use crate::source::FrameRecord;
use crate::state::{Command, ControlStateMachine, Mode, RangeError, VolumeMapper};

/// Fatal errors while bringing the session up
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to query volume range: {0}")]
    VolumeRangeUnavailable(#[source] SinkError),

    #[error("audio sink reported an invalid volume range: {0}")]
    InvalidVolumeRange(#[source] RangeError),
}

/// What one frame did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub verdict: Option<GestureVerdict>,
    /// Commands the sink accepted, in order
    pub applied: Vec<Command>,
    /// Commands the sink rejected
    pub failed: Vec<Command>,
}

/// Point-in-time view of the session for status queries
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub volume_percent: Option<u8>,
    pub fist_streak: u32,
    pub hand_present: bool,
    pub frames_processed: u64,
}

/// A running control session over one audio sink
pub struct Session<S: AudioSink> {
    machine: ControlStateMachine,
    sink: S,
    event_tx: broadcast::Sender<ControlEvent>,
    hand_present: bool,
    frames_processed: u64,
}

impl<S: AudioSink> Session<S> {
    /// Query the sink's volume range and start unmuted
    pub fn start(sink: S, event_tx: broadcast::Sender<ControlEvent>) -> Result<Self, SessionError> {
        let range = sink
            .volume_range()
            .map_err(SessionError::VolumeRangeUnavailable)?
            .validate()
            .map_err(SessionError::InvalidVolumeRange)?;

        info!(
            min_db = range.min_db,
            max_db = range.max_db,
            "volume range acquired"
        );

        Ok(Self {
            machine: ControlStateMachine::new(VolumeMapper::new(range)),
            sink,
            event_tx,
            hand_present: false,
            frames_processed: 0,
        })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.machine.mode(),
            volume_percent: self.machine.volume_percent(),
            fist_streak: self.machine.state().fist_streak,
            hand_present: self.hand_present,
            frames_processed: self.frames_processed,
        }
    }

    /// Validate and process one raw record
    ///
    /// A malformed hand is reported without touching any state; the caller
    /// should skip the frame.
    pub fn process_record(
        &mut self,
        record: FrameRecord,
        default_size: FrameSize,
    ) -> Result<FrameReport, ObservationError> {
        let frame = record.into_frame(default_size)?;
        Ok(self.process_frame(&frame))
    }

    /// Process one validated frame
    pub fn process_frame(&mut self, frame: &Frame) -> FrameReport {
        self.frames_processed += 1;

        let Some(hand) = &frame.hand else {
            if self.hand_present {
                self.hand_present = false;
                self.emit(ControlEvent::HandLost);
            }
            return FrameReport::default();
        };

        if !self.hand_present {
            self.hand_present = true;
            self.emit(ControlEvent::HandDetected);
        }

        let verdict = gesture::classify(hand, frame.size);
        let current_scalar = if self.machine.will_toggle(&verdict) && self.machine.wants_capture() {
            self.read_scalar()
        } else {
            None
        };

        let previous_percent = self.machine.volume_percent();
        let commands = self.machine.update(&verdict, current_scalar);
        debug!(?verdict, commands = commands.len(), "frame classified");

        let mut report = FrameReport {
            verdict: Some(verdict),
            ..FrameReport::default()
        };

        for command in commands {
            match self.sink.apply(&command) {
                Ok(()) => {
                    self.announce(&command, previous_percent);
                    report.applied.push(command);
                }
                Err(e) => {
                    warn!(%command, error = %e, "audio sink rejected command");
                    self.machine.rollback(&command);
                    self.emit(ControlEvent::CommandFailed {
                        command,
                        reason: e.to_string(),
                    });
                    report.failed.push(command);

                    // Nothing after a failed mute change applies to the
                    // mode the sink is actually in.
                    if matches!(command, Command::SetMute(_)) {
                        break;
                    }
                }
            }
        }

        report
    }

    /// Current sink level for a mute capture
    fn read_scalar(&self) -> Option<f32> {
        match self.sink.volume_scalar() {
            Ok(scalar) => Some(scalar),
            Err(e) => {
                warn!(error = %e, "could not read volume before mute, keeping saved level");
                None
            }
        }
    }

    /// Emit the event for an accepted command
    fn announce(&self, command: &Command, previous_percent: Option<u8>) {
        match *command {
            Command::SetMute(true) => self.emit(ControlEvent::Muted {
                saved_volume: self.machine.state().last_volume_scalar,
            }),
            Command::SetMute(false) => self.emit(ControlEvent::Unmuted),
            Command::SetVolumeScalar(scalar) => {
                self.emit(ControlEvent::VolumeRestored { scalar })
            }
            Command::SetVolumeDb(db) => {
                if let Some(percent) = self.machine.volume_percent() {
                    if previous_percent != Some(percent) {
                        self.emit(ControlEvent::VolumeChanged { percent, db });
                    }
                }
            }
        }
    }

    fn emit(&self, event: ControlEvent) {
        debug!(%event, "emitting control event");
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}
