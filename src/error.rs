//! Error handling for rewav
//!
//! Every failure is scoped to a single file or conversion call; there are no
//! process-fatal conditions. Decode failures are caught per-file at
//! `Session::add_files`, format failures per-entry at `save_all`/`play_pause`.

use thiserror::Error;

/// Result type alias for rewav operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Main error type for rewav operations
#[derive(Error, Debug)]
pub enum ConvertError {
    // Source audio errors
    #[error("Failed to decode audio: {reason}")]
    DecodeFailed {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Audio contains no samples")]
    EmptyAudio,

    // Host / engine errors
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Playback not available: {reason}")]
    PlaybackUnavailable { reason: String },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConvertError {
    /// Get the stable error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ConvertError::DecodeFailed { .. } => "DECODE_FAILED",
            ConvertError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            ConvertError::EmptyAudio => "EMPTY_AUDIO",
            ConvertError::FileNotFound { .. } => "FILE_NOT_FOUND",
            ConvertError::PlaybackUnavailable { .. } => "PLAYBACK_UNAVAILABLE",
            ConvertError::Io(_) => "IO_ERROR",
            ConvertError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check whether the rest of a batch can proceed after this error
    ///
    /// Per-file errors (bad source, unsupported target format) never abort
    /// sibling operations.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            ConvertError::DecodeFailed { .. }
                | ConvertError::UnsupportedFormat { .. }
                | ConvertError::EmptyAudio
                | ConvertError::FileNotFound { .. }
        )
    }
}
