//! Saved timer presets.
//!
//! A preset is a named, timestamped configuration plus audio preferences.
//! The engine only ever sees the `TimerConfiguration` subset.

mod error;
mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cues::AudioPreferences;
use crate::types::TimerConfiguration;

pub use error::{PresetError, Result};
pub use store::{default_presets_path, PresetStore};

/// Longest preset name kept after normalization.
pub const MAX_NAME_CHARS: usize = 30;

/// A named timer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: Uuid,
    pub name: String,
    pub get_ready_seconds: i64,
    pub work_seconds: i64,
    pub rest_seconds: i64,
    pub sets: i64,
    pub rounds: i64,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub voice_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Preset {
    /// Name used when none is given.
    pub const DEFAULT_NAME: &'static str = "New Timer";

    /// The "New Timer" preset: 10s get-ready, 60s work, 60s rest, 4 rounds.
    pub fn make_default(updated_at: DateTime<Utc>) -> Self {
        Self::from_configuration(
            Self::DEFAULT_NAME,
            &TimerConfiguration::default(),
            AudioPreferences::default(),
            updated_at,
        )
    }

    /// Creates a preset with a fresh id.
    pub fn from_configuration(
        name: &str,
        configuration: &TimerConfiguration,
        audio: AudioPreferences,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            get_ready_seconds: configuration.get_ready_seconds,
            work_seconds: configuration.work_seconds,
            rest_seconds: configuration.rest_seconds,
            sets: configuration.sets,
            rounds: configuration.rounds,
            sound_enabled: audio.sound_enabled,
            voice_enabled: audio.voice_enabled,
            updated_at,
        }
    }

    /// Trims, caps at [`MAX_NAME_CHARS`] and falls back to the default name.
    pub fn normalized_name(name: &str) -> String {
        let capped: String = name.trim().chars().take(MAX_NAME_CHARS).collect();
        if capped.is_empty() {
            Self::DEFAULT_NAME.to_string()
        } else {
            capped
        }
    }

    /// Clamps every field. Work and rest never drop below one second in a
    /// saved preset.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let max = TimerConfiguration::MAX_DURATION_SECONDS;
        let max_count = TimerConfiguration::MAX_SETS_ROUNDS;
        Self {
            id: self.id,
            name: Self::normalized_name(&self.name),
            get_ready_seconds: self.get_ready_seconds.clamp(0, max),
            work_seconds: self.work_seconds.clamp(1, max),
            rest_seconds: self.rest_seconds.clamp(1, max),
            sets: self.sets.clamp(1, max_count),
            rounds: self.rounds.clamp(1, max_count),
            sound_enabled: self.sound_enabled,
            voice_enabled: self.voice_enabled,
            updated_at: self.updated_at,
        }
    }

    /// The normalized configuration handed to the engine.
    pub fn timer_configuration(&self) -> TimerConfiguration {
        TimerConfiguration::new(
            self.get_ready_seconds,
            self.work_seconds,
            self.rest_seconds,
            self.sets,
            self.rounds,
        )
        .normalized()
    }

    pub fn audio_preferences(&self) -> AudioPreferences {
        AudioPreferences::new(self.sound_enabled, self.voice_enabled)
    }

    /// e.g. `Get Ready 0:10, Work 1:00, Rest 1:00, Sets 1, Rounds 4`
    pub fn summary(&self) -> String {
        format!(
            "Get Ready {}, Work {}, Rest {}, Sets {}, Rounds {}",
            Self::format_duration(self.get_ready_seconds),
            Self::format_duration(self.work_seconds),
            Self::format_duration(self.rest_seconds),
            self.sets,
            self.rounds
        )
    }

    /// Formats seconds as `m:ss`.
    pub fn format_duration(seconds: i64) -> String {
        let clamped = seconds.max(0);
        format!("{}:{:02}", clamped / 60, clamped % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.timestamp_opt(0, 0).unwrap()
    }

    #[test]
    fn test_make_default() {
        let preset = Preset::make_default(epoch());
        assert_eq!(preset.name, "New Timer");
        assert_eq!(preset.timer_configuration(), TimerConfiguration::new(10, 60, 60, 1, 4));
        assert!(preset.sound_enabled && preset.voice_enabled);
    }

    #[test]
    fn test_normalized_name() {
        assert_eq!(Preset::normalized_name("  Tabata \n"), "Tabata");
        assert_eq!(Preset::normalized_name("   "), "New Timer");
        assert_eq!(Preset::normalized_name(&"x".repeat(45)).chars().count(), 30);
        assert_eq!(Preset::normalized_name(&"é".repeat(31)), "é".repeat(30));
    }

    #[test]
    fn test_normalized_keeps_work_rest_positive() {
        let mut preset = Preset::make_default(epoch());
        preset.get_ready_seconds = -3;
        preset.work_seconds = 0;
        preset.rest_seconds = -10;
        preset.sets = 0;
        preset.rounds = 1_000;

        let normalized = preset.normalized();
        assert_eq!(normalized.get_ready_seconds, 0);
        assert_eq!(normalized.work_seconds, 1);
        assert_eq!(normalized.rest_seconds, 1);
        assert_eq!(normalized.sets, 1);
        assert_eq!(normalized.rounds, 99);
        assert_eq!(normalized.id, preset.id);
    }

    #[test]
    fn test_timer_configuration_is_normalized() {
        let mut preset = Preset::make_default(epoch());
        preset.work_seconds = 200_000;
        assert!(preset.timer_configuration().is_normalized());
    }

    #[test]
    fn test_summary_and_format() {
        let preset = Preset::make_default(epoch());
        assert_eq!(
            preset.summary(),
            "Get Ready 0:10, Work 1:00, Rest 1:00, Sets 1, Rounds 4"
        );
        assert_eq!(Preset::format_duration(-5), "0:00");
        assert_eq!(Preset::format_duration(3_725), "62:05");
    }

    #[test]
    fn test_deserialize_defaults_audio_flags() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000000",
            "name": "Old",
            "getReadySeconds": 5,
            "workSeconds": 20,
            "restSeconds": 10,
            "sets": 1,
            "rounds": 8,
            "updatedAt": "2025-01-01T00:00:00Z"
        }"#;
        let preset: Preset = serde_json::from_str(json).unwrap();
        assert_eq!(preset.audio_preferences(), AudioPreferences::default());
        assert_eq!(preset.rounds, 8);
    }
}
