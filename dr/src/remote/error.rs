//! Remote service error types

use thiserror::Error;

/// Errors that can occur when talking to the remote service
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RemoteError {
    /// HTTP status code associated with this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Api { status, .. } => Some(*status),
            RemoteError::Network(e) => e.status().map(|s| s.as_u16()),
            RemoteError::MissingCredential(_) => None,
            RemoteError::InvalidResponse(_) => None,
            RemoteError::Json(_) => None,
        }
    }

    /// Client-class failure (400-499) that will not resolve on retry
    pub fn is_fatal(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is retryable on the next poll tick
    ///
    /// Network failures, server-class statuses and errors without a status
    /// are all transient.
    pub fn is_transient(&self) -> bool {
        !self.is_fatal()
    }

    /// The model could not serve the request (404 or any 5xx)
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self.status(), Some(status) if status == 404 || status >= 500)
    }
}
