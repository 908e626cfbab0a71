//! Error types shared by the whole crate.
//!
//! `Configuration` and `Decryption` never overlap: a token that cannot be
//! used is always `Configuration`, a blob that fails the padding check under
//! a usable key is always `Decryption`. Messages never carry key material.

use thiserror::Error;

/// Result type for cenvars operations.
pub type Result<T> = std::result::Result<T, CenvarsError>;

#[derive(Debug, Error)]
pub enum CenvarsError {
    /// The token (or the place it is read from) is missing, malformed or
    /// internally inconsistent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Ciphertext failed the padding check under the given key.
    #[error("decryption error: {0}")]
    Decryption(String),

    /// Failure reported by the transport collaborator, passed through as-is.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A logic or framing invariant was violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CenvarsError {
    pub fn configuration(message: impl Into<String>) -> Self {
        CenvarsError::Configuration(message.into())
    }

    pub fn decryption(message: impl Into<String>) -> Self {
        CenvarsError::Decryption(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CenvarsError::Internal(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, CenvarsError::Configuration(_))
    }

    pub fn is_decryption(&self) -> bool {
        matches!(self, CenvarsError::Decryption(_))
    }
}

/// Errors raised by an [`HttpTransport`](crate::infrastructure::transport::HttpTransport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}
