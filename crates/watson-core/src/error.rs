//! Error types for the Watson launcher.

use std::time::Duration;
use thiserror::Error;

/// Backend errors - caught at the call site, never surfaced to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// A backend command ran and reported failure.
    #[error("Command '{command}' failed: {message}")]
    Command { command: String, message: String },

    /// The referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend did not answer in time.
    #[error("Backend timeout after {duration:?}")]
    Timeout { duration: Duration },

    /// Backend not reachable (e.g., not initialized).
    #[error("Backend unavailable")]
    Unavailable,

    /// Channel communication error.
    #[error("Channel error: {0}")]
    Channel(String),
}

impl BackendError {
    /// Build a command failure.
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid keybinding entry.
    #[error("Invalid binding: {0}")]
    InvalidBinding(String),
}
