//! Cue playback error types.

use thiserror::Error;

/// Errors that can occur while playing a cue.
///
/// Cues are never critical: the driver logs these and keeps the session
/// running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CueError {
    /// Writing the cue to its output failed.
    #[error("failed to write cue output: {0}")]
    Output(String),

    /// The cue output is not available (e.g. no terminal attached).
    #[error("cue output unavailable: {0}")]
    Unavailable(String),
}

impl CueError {
    /// Returns true if the output device itself is missing.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Output(_) => "check that the terminal is still attached",
            Self::Unavailable(_) => "run with --no-sound --no-voice to silence cues",
        }
    }
}

impl From<std::io::Error> for CueError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::NotConnected => {
                Self::Unavailable(err.to_string())
            }
            _ => Self::Output(err.to_string()),
        }
    }
}
