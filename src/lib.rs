//! Gym Pulse Timer Library
//!
//! This library provides the core functionality for the interval timer CLI.
//! It includes:
//! - Phase state machine driving get-ready, work and rest phases
//! - Audio cue tracking and playback
//! - Live activity payloads for glanceable surfaces
//! - Preset storage
//! - CLI command parsing, display utilities and the session driver
//! - Type definitions for configuration and state

pub mod cli;
pub mod config;
pub mod cues;
pub mod engine;
pub mod live;
pub mod presets;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{SessionState, TimerConfiguration, TimerPhase, Timestamp};

pub use engine::{SessionSnapshot, TimerEngine};

pub use cues::{
    AudioPreferences, CueChannel, CueError, CueEvent, CuePlayer, CueTracker, MockCuePlayer,
    TerminalCuePlayer,
};

pub use live::{LiveActivityAttributes, LiveActivityContent, LiveActivityTracker, LiveActivityUpdate};

pub use presets::{Preset, PresetError, PresetStore};

pub use config::{AppConfig, ConfigError};
