//! Error types shared across Emotrace crates.

use std::path::PathBuf;

/// Top-level error type for Emotrace operations.
///
/// Library crates keep their own narrow error enums; this type is what the
/// tooling layer converts them into when it needs one error to report.
#[derive(Debug, thiserror::Error)]
pub enum EmotraceError {
    #[error("Frame error: {message}")]
    Frame { message: String },

    #[error("Detection error: {message}")]
    Detection { message: String },

    #[error("Profile error: {message}")]
    Profile { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using EmotraceError.
pub type EmotraceResult<T> = Result<T, EmotraceError>;

impl EmotraceError {
    pub fn frame(msg: impl Into<String>) -> Self {
        Self::Frame {
            message: msg.into(),
        }
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn profile(msg: impl Into<String>) -> Self {
        Self::Profile {
            message: msg.into(),
        }
    }
}
