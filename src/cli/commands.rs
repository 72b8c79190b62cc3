//! Command definitions for the interval timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cues::{AudioPreferences, CueChannel};
use crate::types::TimerConfiguration;

// ============================================================================
// CLI Structure
// ============================================================================

/// Gym Pulse Timer - interval workout timer
#[derive(Parser, Debug)]
#[command(
    name = "gympulse",
    version,
    about = "Interval workout timer",
    long_about = "Runs get-ready, work and rest phases across sets and rounds in the terminal,\n\
                  with beep and spoken cues. Presets can be saved and reused.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Presets file (defaults to ~/.gympulse/presets.json)
    #[arg(long, global = true, env = "GYMPULSE_PRESETS", value_name = "PATH")]
    pub presets_file: Option<PathBuf>,

    /// Config file (defaults to ~/.gympulse/config.json)
    #[arg(long, global = true, env = "GYMPULSE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a workout session
    Run(RunArgs),

    /// Manage saved presets
    Presets {
        #[command(subcommand)]
        command: PresetCommands,
    },

    /// Check cue output
    Cues {
        #[command(subcommand)]
        command: CueCommands,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Preset subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PresetCommands {
    /// List saved presets, newest first
    List,

    /// Show one preset
    Show {
        /// Preset name or id
        preset: String,
    },

    /// Save a new preset
    Save(SaveArgs),

    /// Rename a preset
    Rename {
        /// Preset name or id
        preset: String,
        /// New name
        new_name: String,
    },

    /// Delete a preset
    Delete {
        /// Preset name or id
        preset: String,
    },
}

/// Cue subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CueCommands {
    /// Play a sample beep and spoken phrase
    Preview(PreviewArgs),
}

/// Arguments for the cues preview command
#[derive(Args, Debug, Clone, Default)]
pub struct PreviewArgs {
    /// Preview only the beep
    #[arg(long, conflicts_with = "voice")]
    pub sound: bool,

    /// Preview only the spoken phrase
    #[arg(long)]
    pub voice: bool,
}

impl PreviewArgs {
    /// Channels to preview; both when neither flag is given.
    pub fn channels(&self) -> Vec<CueChannel> {
        match (self.sound, self.voice) {
            (true, false) => vec![CueChannel::Sound],
            (false, true) => vec![CueChannel::Voice],
            _ => CueChannel::ALL.to_vec(),
        }
    }
}

// ============================================================================
// Shared Arguments
// ============================================================================

/// Phase durations and counts. Unset values fall back to the preset (or
/// the default configuration).
#[derive(Args, Debug, Clone, Default)]
pub struct IntervalArgs {
    /// Get-ready duration in seconds (0 skips it)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(i64).range(0..=TimerConfiguration::MAX_DURATION_SECONDS)
    )]
    pub get_ready: Option<i64>,

    /// Work duration in seconds
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(i64).range(0..=TimerConfiguration::MAX_DURATION_SECONDS)
    )]
    pub work: Option<i64>,

    /// Rest duration in seconds
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(i64).range(0..=TimerConfiguration::MAX_DURATION_SECONDS)
    )]
    pub rest: Option<i64>,

    /// Number of sets (1-99)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(i64).range(1..=TimerConfiguration::MAX_SETS_ROUNDS)
    )]
    pub sets: Option<i64>,

    /// Rounds per set (1-99)
    #[arg(
        long,
        value_parser = clap::value_parser!(i64).range(1..=TimerConfiguration::MAX_SETS_ROUNDS)
    )]
    pub rounds: Option<i64>,
}

impl IntervalArgs {
    /// Overrides the fields of `base` that were given on the command line.
    pub fn apply(&self, base: TimerConfiguration) -> TimerConfiguration {
        TimerConfiguration {
            get_ready_seconds: self.get_ready.unwrap_or(base.get_ready_seconds),
            work_seconds: self.work.unwrap_or(base.work_seconds),
            rest_seconds: self.rest.unwrap_or(base.rest_seconds),
            sets: self.sets.unwrap_or(base.sets),
            rounds: self.rounds.unwrap_or(base.rounds),
        }
        .normalized()
    }
}

/// Cue channel switches.
#[derive(Args, Debug, Clone, Default)]
pub struct AudioArgs {
    /// Disable beep cues
    #[arg(long)]
    pub no_sound: bool,

    /// Disable spoken cues
    #[arg(long)]
    pub no_voice: bool,
}

impl AudioArgs {
    /// Turns off the channels disabled on the command line.
    pub fn apply(&self, base: AudioPreferences) -> AudioPreferences {
        AudioPreferences::new(
            base.sound_enabled && !self.no_sound,
            base.voice_enabled && !self.no_voice,
        )
    }
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Start from a saved preset (name or id)
    #[arg(short, long)]
    pub preset: Option<String>,

    #[command(flatten)]
    pub intervals: IntervalArgs,

    #[command(flatten)]
    pub audio: AudioArgs,
}

/// Arguments for the presets save command
#[derive(Args, Debug, Clone)]
pub struct SaveArgs {
    /// Preset name (trimmed, max 30 characters)
    pub name: String,

    #[command(flatten)]
    pub intervals: IntervalArgs,

    #[command(flatten)]
    pub audio: AudioArgs,
}

// ============================================================================
// Tests
// ============================================================================
