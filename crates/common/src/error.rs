//! Error types shared across uipick crates.
//!
//! Only the I/O edges (fixture loading, configuration, journals) return
//! these. Picking and validation report failure as data, never as `Err`.

use std::path::PathBuf;

/// Top-level error type for uipick operations.
#[derive(Debug, thiserror::Error)]
pub enum UiPickError {
    #[error("Tree error: {message}")]
    Tree { message: String },

    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using UiPickError.
pub type UiPickResult<T> = Result<T, UiPickError>;

impl UiPickError {
    pub fn tree(msg: impl Into<String>) -> Self {
        Self::Tree {
            message: msg.into(),
        }
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}
