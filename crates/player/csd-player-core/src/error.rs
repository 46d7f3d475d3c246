//! Error types for the scene player

use serde::{Deserialize, Serialize};

/// Convenience alias used across the crate.
pub type Result<T> = core::result::Result<T, PlayerError>;

/// Failure reported by an [`crate::assets::Assets`] implementation.
///
/// `status` carries an HTTP-style status code when the loader has one;
/// filesystem or in-memory loaders leave it `None`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("failed to load '{path}': {reason}")]
pub struct LoadError {
    pub path: String,
    pub status: Option<u16>,
    pub reason: String,
}

impl LoadError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: None,
            reason: reason.into(),
        }
    }

    pub fn with_status(path: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: Some(status),
            reason: reason.into(),
        }
    }
}

/// Comprehensive error type for playback operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlayerError {
    /// Asset fetch failed (document, atlas descriptor, or texture path)
    #[error("{0}")]
    Load(#[from] LoadError),

    /// Malformed document or atlas descriptor
    #[error("failed to parse '{path}': {reason}")]
    Parse { path: String, reason: String },

    /// Requested sprite name absent from a resolved atlas
    #[error("sprite frame '{frame}' not found in '{atlas}'")]
    FrameNotFound { frame: String, atlas: String },

    /// play() requested an undefined clip name
    #[error("unknown animation clip: {name}")]
    UnknownClip { name: String },

    /// No nested player exists under the given node name
    #[error("no nested player under node: {name}")]
    SubPlayerNotFound { name: String },
}

impl PlayerError {
    pub fn parse(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FrameNotFound { .. } | Self::UnknownClip { .. } | Self::SubPlayerNotFound { .. }
        )
    }

    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::Parse { .. } => "parse",
            Self::FrameNotFound { .. } => "atlas",
            Self::UnknownClip { .. } | Self::SubPlayerNotFound { .. } => "playback",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_recoverability() {
        let recoverable = PlayerError::UnknownClip {
            name: "intro".to_string(),
        };
        assert!(recoverable.is_recoverable());

        let non_recoverable = PlayerError::Load(LoadError::with_status("scene.json", 404, "HTTP 404"));
        assert!(!non_recoverable.is_recoverable());
    }

    #[test]
    fn test_error_categories() {
        let load = PlayerError::Load(LoadError::new("a.plist", "connection refused"));
        assert_eq!(load.category(), "load");

        let clip = PlayerError::UnknownClip {
            name: "x".to_string(),
        };
        assert_eq!(clip.category(), "playback");
    }

    #[test]
    fn test_load_error_display() {
        let err = LoadError::with_status("res/a.json", 404, "HTTP 404");
        assert_eq!(err.to_string(), "failed to load 'res/a.json': HTTP 404");
    }

    #[test]
    fn test_serialization() {
        let error = PlayerError::FrameNotFound {
            frame: "title_J.png".to_string(),
            atlas: "game_jackpot1.plist".to_string(),
        };
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: PlayerError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }
}
