use md_ratelimit::RateLimitError;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    /// Upstream answered with a non-2xx status
    #[error("Upstream HTTP error: {status} {status_text}")]
    UpstreamHttp { status: u16, status_text: String },

    /// No response was obtained (DNS, connect, timeout, aborted body)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Response body is not JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// Body is JSON but does not match the shape expected for the endpoint
    #[error("Unexpected response shape from {path}: {source}")]
    Schema {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Rate limiter refused request: {0}")]
    RateLimit(#[from] RateLimitError),
}

/// Coarse classification used when an error has to cross a boundary by value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpErrorKind {
    UpstreamHttp,
    Transport,
    Json,
    Schema,
    RateLimit,
}

impl HttpError {
    pub fn kind(&self) -> HttpErrorKind {
        match self {
            HttpError::UpstreamHttp { .. } => HttpErrorKind::UpstreamHttp,
            HttpError::Transport(_) => HttpErrorKind::Transport,
            HttpError::Json(_) => HttpErrorKind::Json,
            HttpError::Schema { .. } => HttpErrorKind::Schema,
            HttpError::RateLimit(_) => HttpErrorKind::RateLimit,
        }
    }

    /// HTTP status for upstream errors
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::UpstreamHttp { status, .. } => Some(*status),
            HttpError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn upstream(status: reqwest::StatusCode) -> Self {
        HttpError::UpstreamHttp { status: status.as_u16(), status_text: status.canonical_reason().unwrap_or("").to_string() }
    }
}

pub type Result<T> = std::result::Result<T, HttpError>;
