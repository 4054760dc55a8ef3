//! Error types for adapters.

use thiserror::Error;

/// Errors that can occur when fetching a provider's status.
///
/// Variants fall into two families: fetch failures (`Http`, `Connection`,
/// `Timeout`), which are transient, and `Parse`, which means the payload did
/// not have the shape the adapter expects and usually points at an adapter
/// bug or a provider API change.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Endpoint answered with a non-2xx status, or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Connection to the endpoint failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Payload did not match the provider's expected shape or vocabulary.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl AdapterError {
    /// True for the payload-shape family.
    pub fn is_parse(&self) -> bool {
        matches!(self, AdapterError::Parse(_))
    }

    /// True for the transient network family.
    pub fn is_fetch(&self) -> bool {
        !self.is_parse()
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Parse(err.to_string())
    }
}
