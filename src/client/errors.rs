//! Client errors.

use thiserror::Error;

use crate::client::wire::NormalizeError;

/// Errors that can occur when talking to the sales backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request. The message is the backend's own, unaltered.
    #[error("{message}")]
    Backend {
        /// HTTP status code
        status: u16,

        /// Human-readable message from the response body
        message: String,
    },

    /// A response record did not fit the canonical schema.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl ApiError {
    /// HTTP status of a backend rejection.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            ApiError::Http(error) => error.status().map(|status| status.as_u16()),
            ApiError::Normalize(_) => None,
        }
    }
}
