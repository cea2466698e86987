//! Feed and image loading error types.

use thiserror::Error;

/// Errors produced while fetching pages, comments or images.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum FeedError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("response content type {content_type:?} is not an image")]
    InvalidContentType { content_type: Option<String> },

    #[error("failed to parse response: {message}")]
    Parse { message: String },

    #[error("failed to decode image: {message}")]
    Decode { message: String },

    #[error("request cancelled")]
    Cancelled,

    #[error("failed to create HTTP client: {message}")]
    Client { message: String },
}

impl FeedError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns whether the error is an expected outcome (a superseded request)
    /// rather than a failure.
    #[must_use]
    pub const fn is_benign(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        Self::parse(e.to_string())
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::network("request timed out")
        } else if e.is_connect() {
            Self::network(format!("failed to connect: {e}"))
        } else if e.is_decode() {
            Self::parse(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status {
                status: status.as_u16(),
            }
        } else {
            Self::network(e.to_string())
        }
    }
}
