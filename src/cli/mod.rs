//! CLI module for the interval timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `runner`: Foreground session driver

pub mod commands;
pub mod display;
pub mod runner;

pub use commands::{
    AudioArgs, Cli, Commands, CueCommands, IntervalArgs, PresetCommands, PreviewArgs, RunArgs,
    SaveArgs,
};
pub use display::Display;
pub use runner::{run_session, spawn_stdin_reader, RunOutcome, RunnerCommand, SessionRunner};
