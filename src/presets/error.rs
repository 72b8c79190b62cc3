//! Preset storage error types.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while reading or writing presets.
#[derive(Debug, Error)]
pub enum PresetError {
    /// Reading or writing the preset file failed.
    #[error("preset file I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding the preset list failed.
    #[error("failed to encode presets: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No preset with the given id.
    #[error("preset not found: {0}")]
    NotFound(Uuid),

    /// No preset matched the given name.
    #[error("no preset named '{0}'")]
    NameNotFound(String),

    /// The home directory could not be determined.
    #[error("home directory not found")]
    HomeDirectoryNotFound,
}

/// Result type alias for preset operations.
pub type Result<T> = std::result::Result<T, PresetError>;

impl PresetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the error means the preset does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NameNotFound(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Io { .. } => "check permissions on the presets file or pass --presets-file",
            Self::Serialization(_) => "the preset data could not be encoded; please report this",
            Self::NotFound(_) | Self::NameNotFound(_) => "run `gympulse presets list` to see saved presets",
            Self::HomeDirectoryNotFound => "set HOME or pass --presets-file",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PresetError::io(
            "/tmp/presets.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/presets.json"));
        assert!(err.to_string().contains("denied"));

        let err = PresetError::NameNotFound("Tabata".to_string());
        assert!(err.to_string().contains("Tabata"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(PresetError::NotFound(Uuid::nil()).is_not_found());
        assert!(PresetError::NameNotFound("x".into()).is_not_found());
        assert!(!PresetError::HomeDirectoryNotFound.is_not_found());
    }

    #[test]
    fn test_suggestion() {
        assert!(PresetError::HomeDirectoryNotFound
            .suggestion()
            .contains("--presets-file"));
        assert!(PresetError::NotFound(Uuid::nil())
            .suggestion()
            .contains("presets list"));
    }
}
