//! Audio cue system for the interval timer.
//!
//! This module turns session snapshots into phase-start and countdown cues:
//!
//! - `CueTracker` diffs consecutive snapshots and decides which cues fire
//! - `CuePlayer` plays a cue (terminal implementation and a test mock)
//! - Failures never stop the session
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  snapshot  ┌──────────────┐  CueEvent  ┌──────────────┐
//! │ TimerEngine  │──────────▶│  CueTracker  │──────────▶│  CuePlayer   │
//! └──────────────┘            └──────────────┘            └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use chrono::Utc;
//! use gympulse::cues::{AudioPreferences, CuePlayer, CueTracker, MockCuePlayer};
//! use gympulse::engine::TimerEngine;
//! use gympulse::types::TimerConfiguration;
//!
//! let now = Utc::now();
//! let mut engine = TimerEngine::new(TimerConfiguration::default());
//! engine.start(now);
//!
//! let mut tracker = CueTracker::default();
//! let player = MockCuePlayer::new();
//! if let Some(snapshot) = engine.snapshot(now) {
//!     for cue in tracker.observe(&snapshot) {
//!         player.play(&cue).expect("mock playback");
//!     }
//! }
//! assert_eq!(player.play_count(), 1);
//! ```

mod error;
mod terminal;
mod tracker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::types::TimerPhase;

pub use error::CueError;
pub use terminal::TerminalCuePlayer;
pub use tracker::{CueTracker, DEFAULT_COUNTDOWN_WINDOW};

// ============================================================================
// CueEvent
// ============================================================================

/// A cue the presentation layer should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CueEvent {
    /// A new phase began
    PhaseStarted(TimerPhase),
    /// N whole seconds left in the phase
    Countdown(u32),
}

impl CueEvent {
    /// Spoken phrase for this cue, or `None` when the cue is silent
    /// (completion and a zero countdown).
    pub fn phrase(&self) -> Option<String> {
        match self {
            CueEvent::PhaseStarted(TimerPhase::Complete) => None,
            CueEvent::PhaseStarted(TimerPhase::GetReady) => Some("Get ready".to_string()),
            CueEvent::PhaseStarted(phase) => Some(phase.display_name().to_string()),
            CueEvent::Countdown(0) => None,
            CueEvent::Countdown(second) => Some(second.to_string()),
        }
    }
}

// ============================================================================
// AudioPreferences
// ============================================================================

/// Which cue channels are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioPreferences {
    /// Beep on every cue
    pub sound_enabled: bool,
    /// Speak the cue phrase
    pub voice_enabled: bool,
}

impl Default for AudioPreferences {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl AudioPreferences {
    pub fn new(sound_enabled: bool, voice_enabled: bool) -> Self {
        Self {
            sound_enabled,
            voice_enabled,
        }
    }

    /// Both channels off.
    pub fn muted() -> Self {
        Self::new(false, false)
    }

    pub fn is_silent(&self) -> bool {
        !self.sound_enabled && !self.voice_enabled
    }
}

// ============================================================================
// CueChannel
// ============================================================================

/// One cue output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CueChannel {
    Sound,
    Voice,
}

impl CueChannel {
    pub const ALL: [CueChannel; 2] = [CueChannel::Sound, CueChannel::Voice];

    /// Phrase spoken when previewing the voice channel.
    pub const PREVIEW_PHRASE: &'static str = "Get ready";
}

// ============================================================================
// CuePlayer
// ============================================================================

/// Trait for cue playback implementations.
pub trait CuePlayer {
    /// Plays a cue. Silent cues succeed without output.
    ///
    /// # Errors
    ///
    /// Returns an error if the output fails.
    fn play(&self, cue: &CueEvent) -> Result<(), CueError>;

    /// Returns the current channel preferences.
    fn preferences(&self) -> AudioPreferences;

    /// Replaces the channel preferences.
    fn update_preferences(&self, preferences: AudioPreferences);

    /// Plays a sample on one channel, ignoring the preferences, so the
    /// user can check their output before a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the output fails.
    fn preview(&self, channel: CueChannel) -> Result<(), CueError>;
}

/// Mock cue player for testing.
#[derive(Debug)]
pub struct MockCuePlayer {
    play_calls: Mutex<Vec<CueEvent>>,
    preview_calls: Mutex<Vec<CueChannel>>,
    preferences: Mutex<AudioPreferences>,
    should_fail: AtomicBool,
}

impl Default for MockCuePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCuePlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_calls: Mutex::new(Vec::new()),
            preview_calls: Mutex::new(Vec::new()),
            preferences: Mutex::new(AudioPreferences::default()),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<CueEvent> {
        self.play_calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn get_preview_calls(&self) -> Vec<CueChannel> {
        self.preview_calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.play_calls.lock().unwrap().clear();
        self.preview_calls.lock().unwrap().clear();
    }
}

impl CuePlayer for MockCuePlayer {
    fn play(&self, cue: &CueEvent) -> Result<(), CueError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(CueError::Output("Mock failure".to_string()));
        }
        if self.preferences().is_silent() {
            return Ok(());
        }
        self.play_calls.lock().unwrap().push(*cue);
        Ok(())
    }

    fn preferences(&self) -> AudioPreferences {
        *self.preferences.lock().unwrap()
    }

    fn update_preferences(&self, preferences: AudioPreferences) {
        *self.preferences.lock().unwrap() = preferences;
    }

    fn preview(&self, channel: CueChannel) -> Result<(), CueError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(CueError::Output("Mock failure".to_string()));
        }
        self.preview_calls.lock().unwrap().push(channel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrases() {
        assert_eq!(
            CueEvent::PhaseStarted(TimerPhase::GetReady).phrase().as_deref(),
            Some("Get ready")
        );
        assert_eq!(
            CueEvent::PhaseStarted(TimerPhase::Work).phrase().as_deref(),
            Some("Work")
        );
        assert_eq!(
            CueEvent::PhaseStarted(TimerPhase::Rest).phrase().as_deref(),
            Some("Rest")
        );
        assert_eq!(CueEvent::PhaseStarted(TimerPhase::Complete).phrase(), None);
        assert_eq!(CueEvent::Countdown(3).phrase().as_deref(), Some("3"));
        assert_eq!(CueEvent::Countdown(0).phrase(), None);
    }

    #[test]
    fn test_cue_event_serialize() {
        let json = serde_json::to_string(&CueEvent::Countdown(2)).unwrap();
        assert_eq!(json, r#"{"type":"countdown","value":2}"#);

        let json = serde_json::to_string(&CueEvent::PhaseStarted(TimerPhase::GetReady)).unwrap();
        assert_eq!(json, r#"{"type":"phaseStarted","value":"getReady"}"#);
    }

    #[test]
    fn test_preferences() {
        assert!(!AudioPreferences::default().is_silent());
        assert!(AudioPreferences::muted().is_silent());
        assert!(!AudioPreferences::new(false, true).is_silent());
    }

    #[test]
    fn test_mock_records_calls() {
        let player = MockCuePlayer::new();
        player.play(&CueEvent::Countdown(1)).unwrap();
        assert_eq!(player.get_play_calls(), vec![CueEvent::Countdown(1)]);

        player.clear_calls();
        assert_eq!(player.play_count(), 0);
    }

    #[test]
    fn test_mock_failure() {
        let player = MockCuePlayer::new();
        player.set_should_fail(true);
        assert!(player.play(&CueEvent::Countdown(1)).is_err());
        assert_eq!(player.play_count(), 0);
    }

    #[test]
    fn test_mock_preview_ignores_preferences() {
        let player = MockCuePlayer::new();
        player.update_preferences(AudioPreferences::muted());
        for channel in CueChannel::ALL {
            player.preview(channel).unwrap();
        }
        assert_eq!(
            player.get_preview_calls(),
            vec![CueChannel::Sound, CueChannel::Voice]
        );
        assert_eq!(player.play_count(), 0);

        player.set_should_fail(true);
        assert!(player.preview(CueChannel::Voice).is_err());
    }

    #[test]
    fn test_mock_muted_records_nothing() {
        let player = MockCuePlayer::new();
        player.update_preferences(AudioPreferences::muted());
        player.play(&CueEvent::Countdown(1)).unwrap();
        assert_eq!(player.play_count(), 0);
    }
}
