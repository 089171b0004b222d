//! Error handling for the stocking stuffer miner
//!
//! Error types covering argument validation, search exhaustion, cancellation
//! and configuration loading.

use thiserror::Error;

/// Result type alias for mining operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the miner
#[derive(Error, Debug)]
pub enum Error {
    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Arguments the search cannot run with
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The candidate range ran out before a solution was found
    #[error("Search space exhausted: no candidate up to {last_candidate} has {leading_zeros} leading zero nibbles")]
    Exhausted {
        last_candidate: u64,
        leading_zeros: u8,
    },

    /// Cancellation errors
    #[error("Operation was cancelled: {operation}")]
    Cancelled { operation: String },

    /// The two zero checks disagreed about an answer
    #[error("Verification failed: {message}")]
    Verification { message: String },

    /// Background task failures
    #[error("Task failed: {message}")]
    Task { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an exhausted search error
    pub fn exhausted(last_candidate: u64, leading_zeros: u8) -> Self {
        Self::Exhausted {
            last_candidate,
            leading_zeros,
        }
    }

    /// Create a cancellation error
    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// Create a verification error
    pub fn verification(message: impl Into<String>) -> Self {
        Self::Verification {
            message: message.into(),
        }
    }

    /// Create a task error
    pub fn task(message: impl Into<String>) -> Self {
        Self::Task {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Json(_) => "json",
            Error::Yaml(_) => "yaml",
            Error::Io(_) => "io",
            Error::Config { .. } => "config",
            Error::InvalidArgument { .. } => "invalid_argument",
            Error::Exhausted { .. } => "exhausted",
            Error::Cancelled { .. } => "cancelled",
            Error::Verification { .. } => "verification",
            Error::Task { .. } => "task",
        }
    }
}
