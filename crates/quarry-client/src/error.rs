//! Error types for the content API client.

use thiserror::Error;

use crate::types::FailureKind;

/// Errors that can occur when talking to the content API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider rejected the supplied credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message from the provider, if any.
        message: String,
    },

    /// Well-formed rejection from the API (malformed query, missing dataset, ...).
    #[error("Provider error ({status}): {message}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// Error message from the provider.
        message: String,
    },

    /// The provider returned an invalid or unparseable response body.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Whether this error is an authorization rejection.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Map onto the outcome taxonomy surfaced to the embedding UI.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Unauthorized { .. } => FailureKind::Unauthorized,
            Self::Request(_) => FailureKind::NetworkError,
            Self::Provider { .. } | Self::InvalidResponse(_) => FailureKind::ProviderError,
        }
    }
}
