//! Application configuration.
//!
//! Settings for the command-line driver, read from
//! `~/.gympulse/config.json`. Every field has a default so a partial
//! (or missing) file is fine. Command-line flags override these values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::cues::{AudioPreferences, DEFAULT_COUNTDOWN_WINDOW};

/// Fastest allowed driver tick.
pub const MIN_TICK_INTERVAL_MS: u64 = 50;
/// Slowest allowed driver tick.
pub const MAX_TICK_INTERVAL_MS: u64 = 1_000;
/// Longest countdown window in seconds.
pub const MAX_COUNTDOWN_SECONDS: u32 = 10;

fn default_tick_interval_ms() -> u64 {
    250
}

fn default_countdown_seconds() -> u32 {
    DEFAULT_COUNTDOWN_WINDOW
}

fn default_true() -> bool {
    true
}

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration JSON.
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Read { .. } => "check the file permissions",
            Self::Parse { .. } => "fix the JSON or delete the file to use defaults",
        }
    }
}

/// Driver settings.
///
/// # Example
///
/// ```
/// use gympulse::config::AppConfig;
///
/// let config = AppConfig::default();
/// assert_eq!(config.tick_interval_ms, 250);
/// assert_eq!(config.countdown_seconds, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// How often the driver advances the engine, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Seconds at the end of each phase that get a countdown cue.
    #[serde(default = "default_countdown_seconds")]
    pub countdown_seconds: u32,

    /// Preset file location; `~/.gympulse/presets.json` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presets_path: Option<PathBuf>,

    /// Default for the sound channel when no preset says otherwise.
    #[serde(default = "default_true")]
    pub sound_enabled: bool,

    /// Default for the voice channel when no preset says otherwise.
    #[serde(default = "default_true")]
    pub voice_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            countdown_seconds: default_countdown_seconds(),
            presets_path: None,
            sound_enabled: true,
            voice_enabled: true,
        }
    }
}

impl AppConfig {
    /// Returns `~/.gympulse/config.json`, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".gympulse").join("config.json"))
    }

    /// Loads the configuration at `path`. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.clamped())
    }

    /// Loads from the default location, or returns defaults without one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or malformed.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Pulls numeric settings into their supported ranges.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.tick_interval_ms = self
            .tick_interval_ms
            .clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS);
        self.countdown_seconds = self.countdown_seconds.min(MAX_COUNTDOWN_SECONDS);
        self
    }

    /// Default cue channels.
    pub fn audio_preferences(&self) -> AudioPreferences {
        AudioPreferences::new(self.sound_enabled, self.voice_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.countdown_seconds, 3);
        assert!(config.presets_path.is_none());
        assert_eq!(config.audio_preferences(), AudioPreferences::default());
    }

    #[test]
    fn test_deserialize_empty_json() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: AppConfig =
            serde_json::from_str(r#"{"tick_interval_ms": 100, "voice_enabled": false}"#).unwrap();
        assert_eq!(config.tick_interval_ms, 100);
        assert!(config.sound_enabled);
        assert!(!config.voice_enabled);
    }

    #[test]
    fn test_clamped() {
        let config = AppConfig {
            tick_interval_ms: 5,
            countdown_seconds: 60,
            ..AppConfig::default()
        }
        .clamped();
        assert_eq!(config.tick_interval_ms, MIN_TICK_INTERVAL_MS);
        assert_eq!(config.countdown_seconds, MAX_COUNTDOWN_SECONDS);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_clamps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"tick_interval_ms": 10000}"#).unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.tick_interval_ms, MAX_TICK_INTERVAL_MS);
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.suggestion().contains("delete"));
    }
}
