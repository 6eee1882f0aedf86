//! Pinch-distance to volume mapping

use serde::{Deserialize, Serialize};

/// Pinch distance (pixels) mapped to 0%
pub const PINCH_MIN_PX: f32 = 20.0;
/// Pinch distance (pixels) mapped to 100%
pub const PINCH_MAX_PX: f32 = 200.0;

/// The sink's native decibel range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeRange {
    pub min_db: f32,
    pub max_db: f32,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RangeError {
    #[error("volume range bounds must be finite (got {min_db}..{max_db})")]
    NonFinite { min_db: f32, max_db: f32 },

    #[error("volume range is empty: min {min_db} dB is not below max {max_db} dB")]
    Empty { min_db: f32, max_db: f32 },
}

impl VolumeRange {
    pub fn new(min_db: f32, max_db: f32) -> Result<Self, RangeError> {
        if !min_db.is_finite() || !max_db.is_finite() {
            return Err(RangeError::NonFinite { min_db, max_db });
        }
        if min_db >= max_db {
            return Err(RangeError::Empty { min_db, max_db });
        }
        Ok(Self { min_db, max_db })
    }

    /// Re-check a range obtained from elsewhere
    pub fn validate(self) -> Result<Self, RangeError> {
        Self::new(self.min_db, self.max_db)
    }

    pub fn span(&self) -> f32 {
        self.max_db - self.min_db
    }
}

/// Linear pinch → percent → decibel mapping for one session
#[derive(Debug, Clone, Copy)]
pub struct VolumeMapper {
    range: VolumeRange,
}

impl VolumeMapper {
    pub fn new(range: VolumeRange) -> Self {
        Self { range }
    }

    /// Volume percent for a pinch distance, saturating outside the input domain
    pub fn percent(&self, pinch_distance: f32) -> f32 {
        let t = (pinch_distance - PINCH_MIN_PX) / (PINCH_MAX_PX - PINCH_MIN_PX);
        (t * 100.0).clamp(0.0, 100.0)
    }

    /// Decibel level for a volume percent
    ///
    /// 0% and 100% land exactly on the range bounds.
    pub fn to_db(&self, percent: f32) -> f32 {
        let t = (percent / 100.0).clamp(0.0, 1.0);
        let db = self.range.min_db * (1.0 - t) + self.range.max_db * t;
        db.clamp(self.range.min_db, self.range.max_db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> VolumeMapper {
        VolumeMapper::new(VolumeRange::new(-65.25, 0.0).unwrap())
    }

    #[test]
    fn test_percent_clamps_both_ends() {
        let m = mapper();
        assert_eq!(m.percent(0.0), 0.0);
        assert_eq!(m.percent(20.0), 0.0);
        assert_eq!(m.percent(110.0), 50.0);
        assert_eq!(m.percent(200.0), 100.0);
        assert_eq!(m.percent(10_000.0), 100.0);
    }

    #[test]
    fn test_db_endpoints() {
        let m = mapper();
        assert_eq!(m.to_db(0.0), -65.25);
        assert_eq!(m.to_db(100.0), 0.0);
        assert_eq!(m.to_db(50.0), -32.625);
    }

    #[test]
    fn test_db_endpoints_are_exact_for_any_range() {
        let ranges = [
            (-0.111, 0.1),
            (-0.09, 0.0),
            (-96.0, 0.0),
            (-65.25, 0.0),
            (-10.3, 7.7),
            (0.3, 0.7),
            (-1e-3, 1e-3),
        ];

        for (min_db, max_db) in ranges {
            let m = VolumeMapper::new(VolumeRange::new(min_db, max_db).unwrap());
            assert_eq!(m.to_db(0.0), min_db, "0% of {min_db}..{max_db}");
            assert_eq!(m.to_db(100.0), max_db, "100% of {min_db}..{max_db}");

            for percent in (0..=100).map(|p| p as f32) {
                let db = m.to_db(percent);
                assert!(
                    (min_db..=max_db).contains(&db),
                    "{percent}% of {min_db}..{max_db} gave {db}"
                );
            }
        }
    }

    #[test]
    fn test_range_validation() {
        assert!(matches!(
            VolumeRange::new(0.0, 0.0),
            Err(RangeError::Empty { .. })
        ));
        assert!(matches!(
            VolumeRange::new(0.0, -10.0),
            Err(RangeError::Empty { .. })
        ));
        assert!(matches!(
            VolumeRange::new(f32::NEG_INFINITY, 0.0),
            Err(RangeError::NonFinite { .. })
        ));

        let unchecked = VolumeRange {
            min_db: f32::NAN,
            max_db: 0.0,
        };
        assert!(unchecked.validate().is_err());
    }
}
