//! Error types shared across exifcard crates.

use std::path::PathBuf;

/// Top-level error type for exifcard operations.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    /// The source image (or a drawing surface derived from it) is not available.
    #[error("Not ready: {message}")]
    NotReady { message: String },

    /// The EXIF decoder produced no usable data.
    #[error("Metadata decode failed: {message}")]
    DecodeFailure { message: String },

    #[error("Image decode error: {message}")]
    ImageDecode { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using CardError.
pub type CardResult<T> = Result<T, CardError>;

impl CardError {
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady {
            message: msg.into(),
        }
    }

    pub fn decode_failure(msg: impl Into<String>) -> Self {
        Self::DecodeFailure {
            message: msg.into(),
        }
    }

    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the error means "try again once an image is loaded".
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }
}
