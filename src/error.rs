//! Unified error handling for the console.
//!
//! Each subsystem defines its own `thiserror` enum; this module folds them
//! into a single `ConsoleError` so the binary and the UI loop can propagate
//! any failure with `?` and still report the precise source.

use thiserror::Error;

/// Main error type that encompasses all possible errors in the console
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("API error: {0}")]
    Api(#[from] crate::api::ApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] crate::session::SessionError),

    #[error("UI error: {0}")]
    Ui(#[from] crate::ui::UiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

impl ConsoleError {
    /// Short, user-facing form of the error for the status line.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Api(e) => e.to_string(),
            ConsoleError::Session(e) => e.to_string(),
            ConsoleError::Config(e) => format!("Configuration problem: {}", e),
            other => other.to_string(),
        }
    }
}
