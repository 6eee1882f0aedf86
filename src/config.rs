//! Configuration loading and management

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::landmarks::FrameSize;
use crate::source::InputSource;
use crate::state::VolumeRange;

const ENV_PREFIX: &str = "GESTURE_VOLUME_";

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the Unix domain socket for IPC
    pub socket_path: PathBuf,

    /// Directory for runtime data
    pub data_dir: PathBuf,

    /// Where frame records are read from
    pub input: InputSource,

    /// Frame geometry for records that do not carry their own
    pub frame_size: FrameSize,

    /// Delay after each forwarded frame (zero = as fast as input arrives)
    pub frame_interval: Duration,

    /// Decibel range of the software mixer
    pub mixer_range: VolumeRange,

    /// Mixer level at startup, as a scalar in `[0, 1]`
    pub initial_volume: f32,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        let home = lookup("HOME").context("HOME is not set")?;
        let data_dir = PathBuf::from(&home)
            .join(".local")
            .join("share")
            .join("gesture-volume");

        let socket_path = var("SOCKET")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("control.sock"));

        let input = match var("INPUT").as_deref() {
            None | Some("-") => InputSource::Stdin,
            Some(path) => InputSource::File(PathBuf::from(path)),
        };

        let defaults = FrameSize::default();
        let frame_size = FrameSize::new(
            parse_or(&var, "FRAME_WIDTH", defaults.width)?,
            parse_or(&var, "FRAME_HEIGHT", defaults.height)?,
        );
        if frame_size.width == 0 || frame_size.height == 0 {
            return Err(anyhow!("frame size must be non-zero, got {:?}", frame_size));
        }

        let frame_interval = Duration::from_millis(parse_or(&var, "FRAME_INTERVAL_MS", 0u64)?);

        let mixer_range = VolumeRange::new(
            parse_or(&var, "MIN_DB", -65.25f32)?,
            parse_or(&var, "MAX_DB", 0.0f32)?,
        )
        .context("invalid mixer volume range")?;

        let initial_volume = parse_or(&var, "INITIAL_VOLUME", 0.5f32)?;
        if !(0.0..=1.0).contains(&initial_volume) {
            return Err(anyhow!(
                "{}INITIAL_VOLUME must be within 0..=1, got {}",
                ENV_PREFIX,
                initial_volume
            ));
        }

        Ok(Self {
            socket_path,
            data_dir,
            input,
            frame_size,
            frame_interval,
            mixer_range,
            initial_volume,
        })
    }

    /// Ensure data directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_or<T, F>(var: &F, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {}{}: {:?}", ENV_PREFIX, name, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = load_with(&[("HOME", "/home/tester")]).unwrap();
        assert_eq!(
            config.socket_path,
            PathBuf::from("/home/tester/.local/share/gesture-volume/control.sock")
        );
        assert_eq!(config.input, InputSource::Stdin);
        assert_eq!(config.frame_size, FrameSize::new(640, 480));
        assert_eq!(config.frame_interval, Duration::ZERO);
        assert_eq!(config.mixer_range.min_db, -65.25);
        assert_eq!(config.mixer_range.max_db, 0.0);
        assert_eq!(config.initial_volume, 0.5);
    }

    #[test]
    fn test_config_overrides() {
        let config = load_with(&[
            ("HOME", "/home/tester"),
            ("GESTURE_VOLUME_INPUT", "/tmp/frames.jsonl"),
            ("GESTURE_VOLUME_SOCKET", "/tmp/gv.sock"),
            ("GESTURE_VOLUME_FRAME_WIDTH", "1280"),
            ("GESTURE_VOLUME_FRAME_HEIGHT", " 720 "),
            ("GESTURE_VOLUME_FRAME_INTERVAL_MS", "33"),
            ("GESTURE_VOLUME_MIN_DB", "-96"),
        ])
        .unwrap();
        assert_eq!(config.input, InputSource::File(PathBuf::from("/tmp/frames.jsonl")));
        assert_eq!(config.socket_path, PathBuf::from("/tmp/gv.sock"));
        assert_eq!(config.frame_size, FrameSize::new(1280, 720));
        assert_eq!(config.frame_interval, Duration::from_millis(33));
        assert_eq!(config.mixer_range.min_db, -96.0);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(load_with(&[]).is_err());
        assert!(load_with(&[("HOME", "/h"), ("GESTURE_VOLUME_FRAME_WIDTH", "wide")]).is_err());
        assert!(load_with(&[("HOME", "/h"), ("GESTURE_VOLUME_FRAME_HEIGHT", "0")]).is_err());
        assert!(load_with(&[("HOME", "/h"), ("GESTURE_VOLUME_MIN_DB", "5")]).is_err());
        assert!(load_with(&[("HOME", "/h"), ("GESTURE_VOLUME_INITIAL_VOLUME", "1.2")]).is_err());
    }
}
