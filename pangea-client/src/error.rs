//! Error types for the Pangea client
//!
//! These are programmer and setup errors only. Anything the remote side does
//! (rejections, timeouts, network trouble) is reported as a
//! [`JobOutcome::Failure`](pangea_core::JobOutcome::Failure) instead.

use pangea_core::InvalidPollConfig;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when configuring or calling the client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The poll configuration can never work
    #[error(transparent)]
    InvalidPollConfig(#[from] InvalidPollConfig),

    /// The service configuration is incomplete or inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Building the HTTP client failed
    #[error("HTTP client setup failed: {0}")]
    HttpSetup(#[from] reqwest::Error),
}

impl ClientError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Check if this error comes from caller-supplied settings
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidPollConfig(_) | Self::InvalidConfig(_))
    }
}
