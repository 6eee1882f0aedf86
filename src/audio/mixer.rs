//! In-process software mixer
//!
//! Keeps a decibel level and a mute flag. The scalar view is linear over
//! the decibel range.

use tracing::debug;

use crate::state::VolumeRange;

use super::sink::{AudioSink, SinkError};

/// Software volume control implementing [`AudioSink`]
#[derive(Debug, Clone)]
pub struct SoftwareMixer {
    range: VolumeRange,
    level_db: f32,
    muted: bool,
}

impl SoftwareMixer {
    /// Create a mixer at `initial_scalar` of its range, unmuted
    pub fn new(range: VolumeRange, initial_scalar: f32) -> Result<Self, SinkError> {
        check_scalar(initial_scalar)?;
        Ok(Self {
            range,
            level_db: range.min_db + range.span() * initial_scalar,
            muted: false,
        })
    }

    pub fn level_db(&self) -> f32 {
        self.level_db
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

fn check_scalar(scalar: f32) -> Result<(), SinkError> {
    if (0.0..=1.0).contains(&scalar) {
        Ok(())
    } else {
        Err(SinkError::ScalarOutOfRange(scalar))
    }
}

impl AudioSink for SoftwareMixer {
    fn volume_range(&self) -> Result<VolumeRange, SinkError> {
        Ok(self.range)
    }

    fn volume_scalar(&self) -> Result<f32, SinkError> {
        Ok((self.level_db - self.range.min_db) / self.range.span())
    }

    fn set_volume_scalar(&mut self, scalar: f32) -> Result<(), SinkError> {
        check_scalar(scalar)?;
        self.level_db = self.range.min_db + self.range.span() * scalar;
        debug!(scalar, level_db = self.level_db, "mixer level set");
        Ok(())
    }

    fn set_volume_db(&mut self, db: f32) -> Result<(), SinkError> {
        if !(self.range.min_db..=self.range.max_db).contains(&db) {
            return Err(SinkError::DbOutOfRange {
                db,
                min_db: self.range.min_db,
                max_db: self.range.max_db,
            });
        }
        self.level_db = db;
        debug!(level_db = db, "mixer level set");
        Ok(())
    }

    fn set_mute(&mut self, muted: bool) -> Result<(), SinkError> {
        self.muted = muted;
        debug!(muted, "mixer mute set");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Command;

    fn mixer() -> SoftwareMixer {
        SoftwareMixer::new(VolumeRange::new(-60.0, 0.0).unwrap(), 0.5).unwrap()
    }

    #[test]
    fn test_initial_level() {
        let m = mixer();
        assert_eq!(m.level_db(), -30.0);
        assert_eq!(m.volume_scalar().unwrap(), 0.5);
        assert!(!m.is_muted());
    }

    #[test]
    fn test_apply_commands() {
        let mut m = mixer();
        m.apply(&Command::SetVolumeDb(-15.0)).unwrap();
        assert_eq!(m.volume_scalar().unwrap(), 0.75);

        m.apply(&Command::SetMute(true)).unwrap();
        assert!(m.is_muted());

        m.apply(&Command::SetVolumeScalar(0.25)).unwrap();
        assert_eq!(m.level_db(), -45.0);
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut m = mixer();
        assert_eq!(
            m.set_volume_scalar(1.5),
            Err(SinkError::ScalarOutOfRange(1.5))
        );
        assert!(matches!(
            m.set_volume_db(3.0),
            Err(SinkError::DbOutOfRange { .. })
        ));
        assert_eq!(m.level_db(), -30.0);

        assert!(SoftwareMixer::new(VolumeRange::new(-60.0, 0.0).unwrap(), -0.1).is_err());
    }
}
