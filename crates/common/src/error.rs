//! Error types shared across Logomark crates.

use std::path::PathBuf;

/// Top-level error type for Logomark operations.
#[derive(Debug, thiserror::Error)]
pub enum LogomarkError {
    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Export produced no output ({requested} item(s) requested, none rendered)")]
    ExportFailed { requested: usize },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

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

/// Result type alias using LogomarkError.
pub type LogomarkResult<T> = Result<T, LogomarkError>;

impl LogomarkError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error only affects a single item and the surrounding
    /// batch may continue.
    pub fn is_per_item(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::Render { .. })
    }
}
