//! Display utilities for the interval timer CLI.
//!
//! This module provides formatted output for:
//! - The live status line while a session runs
//! - Session start/finish messages
//! - Preset listings
//! - Error messages

use std::io::{self, Write};

use crate::cues::CueChannel;
use crate::engine::SessionSnapshot;
use crate::presets::Preset;
use crate::types::TimerConfiguration;

/// Width of the progress bar in the status line.
const PROGRESS_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the session shape and the keyboard controls.
    pub fn show_session_start(configuration: &TimerConfiguration) {
        println!(
            "* Get Ready {}  Work {}  Rest {}  Sets {}  Rounds {}",
            Self::format_time(configuration.get_ready_seconds.max(0) as u32),
            Self::format_time(configuration.work_seconds.max(0) as u32),
            Self::format_time(configuration.rest_seconds.max(0) as u32),
            configuration.sets,
            configuration.rounds
        );
        println!("  p + Enter: pause/resume   r + Enter: restart   q + Enter: stop");
    }

    /// Redraws the status line in place.
    pub fn show_status_line(snapshot: &SessionSnapshot) {
        let mut out = io::stdout().lock();
        let _ = write!(out, "\r\x1b[2K{}", Self::status_line(snapshot));
        let _ = out.flush();
    }

    /// Ends the status line and reports a finished session.
    pub fn show_complete() {
        println!();
        println!("* Session complete");
    }

    /// Ends the status line and reports a stopped session.
    pub fn show_stopped() {
        println!();
        println!("[] Session stopped");
    }

    /// Lists presets, one per line.
    pub fn show_presets(presets: &[Preset]) {
        if presets.is_empty() {
            println!("No saved presets");
            return;
        }
        for preset in presets {
            println!("{:<30}  {}", preset.name, preset.summary());
        }
    }

    /// Shows every field of a preset.
    pub fn show_preset(preset: &Preset) {
        println!("{}", preset.name);
        println!("─────────────────────────────");
        println!("id:        {}", preset.id);
        println!("get ready: {}", Preset::format_duration(preset.get_ready_seconds));
        println!("work:      {}", Preset::format_duration(preset.work_seconds));
        println!("rest:      {}", Preset::format_duration(preset.rest_seconds));
        println!("sets:      {}", preset.sets);
        println!("rounds:    {}", preset.rounds);
        println!("sound:     {}", Self::on_off(preset.sound_enabled));
        println!("voice:     {}", Self::on_off(preset.voice_enabled));
        println!("updated:   {}", preset.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    pub fn show_preset_saved(preset: &Preset) {
        println!("* Saved preset '{}'", preset.name);
        println!("  {}", preset.summary());
    }

    pub fn show_preset_renamed(old_name: &str, preset: &Preset) {
        println!("* Renamed '{}' to '{}'", old_name, preset.name);
    }

    pub fn show_preset_deleted(preset: &Preset) {
        println!("* Deleted preset '{}'", preset.name);
    }

    /// Announces a cue preview.
    pub fn show_cue_preview(channel: CueChannel) {
        match channel {
            CueChannel::Sound => println!("* Sound preview"),
            CueChannel::Voice => println!("* Voice preview"),
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Builds the status line, e.g. `WORK  00:27  [#####...]  Set 1/2  Round 2/3`.
    pub fn status_line(snapshot: &SessionSnapshot) -> String {
        let state = &snapshot.state;
        let mut line = format!(
            "{:<9}  {}  {}  Set {}/{}  Round {}/{}",
            state.phase.label(),
            Self::format_time(snapshot.remaining_seconds),
            Self::progress_bar(snapshot.progress_fraction, PROGRESS_WIDTH),
            state.set_index,
            snapshot.total_sets,
            state.round_index,
            snapshot.total_rounds
        );
        if state.is_paused {
            line.push_str("  (paused)");
        }
        line
    }

    /// Formats seconds as `MM:SS`, or `HH:MM:SS` from one hour up.
    pub fn format_time(total_seconds: u32) -> String {
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        if hours > 0 {
            format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{:02}:{:02}", minutes, seconds)
        }
    }

    /// Renders a fraction as `[####......]`.
    pub fn progress_bar(fraction: f64, width: usize) -> String {
        let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
        format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
    }

    fn on_off(enabled: bool) -> &'static str {
        if enabled {
            "on"
        } else {
            "off"
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
