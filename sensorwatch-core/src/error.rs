//! Error types for the acquisition core.

use thiserror::Error;

/// Errors that can occur while talking to the device relay.
///
/// Transports never surface these to callers — every failure inside a
/// transport collapses into a connectivity signal. They are returned by the
/// command channel and by the internal fetch helpers.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse a response body.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for a response.
    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else {
            TransportError::Http(err.to_string())
        }
    }
}
