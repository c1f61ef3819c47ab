//! Sink transport errors

use std::time::Duration;

/// Failure of a single sink request
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Sink request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Sink transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Sink returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Sink rejected the request: {0}")]
    Rejected(String),
    #[error("Failed to decode sink response: {0}")]
    Decode(String),
}

impl SinkError {
    /// Classify a reqwest failure, keeping timeouts distinct
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            SinkError::Timeout(timeout)
        } else {
            SinkError::Transport(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SinkError::Timeout(_))
    }
}
