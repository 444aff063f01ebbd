use std::time::Duration;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failures talking to the console API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request for {url}: {message}")]
    InvalidRequest { url: String, message: String },

    #[error("invalid credentials header: {0}")]
    InvalidCredentials(String),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    #[error("reading response body from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: hyper::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }
}
