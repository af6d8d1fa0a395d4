//! Application-level error types.

use thiserror::Error;

/// Errors that can occur within the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON (de)serialisation error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not determine the platform config directory")]
    NoConfigDir,

    #[error("invalid color {0:?}: expected #rrggbb")]
    InvalidColor(String),

    #[error("Channel send error: receiver dropped")]
    ChannelClosed,
}

/// Convenience alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;
