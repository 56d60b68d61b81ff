//! Error types for token generation.

use thiserror::Error;

/// Errors that can occur while configuring a generator or computing a token.
#[derive(Debug, Error)]
pub enum SecureTokenError {
    /// Prefix contains characters outside `[A-Za-z0-9_%.~-]`
    #[error("Prefix [{0}] is invalid")]
    InvalidPrefix(String),

    /// Shared secret is empty or contains characters outside `[A-Za-z0-9_]`
    #[error("Shared secret is invalid")]
    InvalidSecret,

    /// Client IP is not a dotted quad
    #[error("Client IP ({0}) is invalid")]
    InvalidClientIp(String),

    /// URL could not be parsed or has no path
    #[error("Invalid URL supplied: {0}")]
    InvalidUrl(String),

    /// Hash algorithm is not one of SHA-256, SHA-384, SHA-512
    #[error("Algorithm [{0}] not defined")]
    UnsupportedAlgorithm(String),

    /// Extra parameters are not a flat name -> value mapping
    #[error("Extra parameters must be a flat mapping: {0}")]
    InvalidParams(String),

    /// Stream path lacks an application or stream segment
    #[error("Application or stream is invalid in path [{0}]")]
    InvalidPath(String),

    /// Shared secret is not set
    #[error("Shared secret is not set")]
    MissingSecret,

    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration file is not valid YAML for a generator
    #[error("Failed to parse configuration: {0}")]
    ConfigFormat(#[from] serde_yaml::Error),
}

/// Result type alias for token operations.
pub type Result<T> = std::result::Result<T, SecureTokenError>;
