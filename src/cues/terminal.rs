//! Terminal cue player.
//!
//! Sound cues ring the terminal bell; voice cues print the spoken phrase
//! on its own line.

use std::io::{self, Write};
use std::sync::Mutex;

use tracing::debug;

use super::error::CueError;
use super::{AudioPreferences, CueChannel, CueEvent, CuePlayer};

/// Terminal bell character.
const BELL: &[u8] = b"\x07";

/// Plays cues by writing to a terminal (or any writer).
pub struct TerminalCuePlayer<W: Write + Send> {
    out: Mutex<W>,
    preferences: Mutex<AudioPreferences>,
}

impl TerminalCuePlayer<io::Stdout> {
    /// Creates a player writing to standard output.
    pub fn stdout(preferences: AudioPreferences) -> Self {
        Self::new(io::stdout(), preferences)
    }
}

impl<W: Write + Send> TerminalCuePlayer<W> {
    /// Creates a player writing to `out`.
    pub fn new(out: W, preferences: AudioPreferences) -> Self {
        Self {
            out: Mutex::new(out),
            preferences: Mutex::new(preferences),
        }
    }

    /// Consumes the player and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<W: Write + Send> CuePlayer for TerminalCuePlayer<W> {
    fn play(&self, cue: &CueEvent) -> Result<(), CueError> {
        let Some(phrase) = cue.phrase() else {
            return Ok(());
        };
        let preferences = self.preferences();
        if preferences.is_silent() {
            debug!(%phrase, "Cues disabled, skipping");
            return Ok(());
        }

        let mut out = self
            .out
            .lock()
            .map_err(|e| CueError::Unavailable(e.to_string()))?;
        if preferences.sound_enabled {
            out.write_all(BELL)?;
        }
        if preferences.voice_enabled {
            writeln!(out, "\r» {phrase}")?;
        }
        out.flush()?;
        Ok(())
    }

    fn preferences(&self) -> AudioPreferences {
        self.preferences
            .lock()
            .map(|p| *p)
            .unwrap_or_else(|e| *e.into_inner())
    }

    fn update_preferences(&self, preferences: AudioPreferences) {
        match self.preferences.lock() {
            Ok(mut current) => *current = preferences,
            Err(e) => *e.into_inner() = preferences,
        }
    }

    fn preview(&self, channel: CueChannel) -> Result<(), CueError> {
        let mut out = self
            .out
            .lock()
            .map_err(|e| CueError::Unavailable(e.to_string()))?;
        match channel {
            CueChannel::Sound => out.write_all(BELL)?,
            CueChannel::Voice => writeln!(out, "\r» {}", CueChannel::PREVIEW_PHRASE)?,
        }
        out.flush()?;
        Ok(())
    }
}
