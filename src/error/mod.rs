//! Error types for Parla.

use thiserror::Error;

/// Primary error type for all Parla operations.
#[derive(Error, Debug)]
pub enum ParlaError {
    #[error("Missing credential for provider '{provider}'")]
    MissingCredential { provider: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Audio decode error: {0}")]
    Decode(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Speech engine error: {0}")]
    Engine(String),

    #[error("Unsupported speech engine: {0}")]
    UnsupportedEngine(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification of an error, used for logging during fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Credential,
    Network,
    Server,
    Api,
    Decode,
    Playback,
    Engine,
    Unknown,
}

impl ParlaError {
    /// Create an API error from a status code and body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingCredential { .. } => ErrorCategory::Credential,
            Self::Network(_) => ErrorCategory::Network,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Credential,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::Decode(_) | Self::Serialization(_) => ErrorCategory::Decode,
            Self::Playback(_) => ErrorCategory::Playback,
            Self::Engine(_) | Self::UnsupportedEngine(_) => ErrorCategory::Engine,
            _ => ErrorCategory::Unknown,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ParlaError>;
