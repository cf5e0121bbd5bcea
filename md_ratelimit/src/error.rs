use thiserror::Error;

/// Result type for rate limiting operations
pub type Result<T> = std::result::Result<T, RateLimitError>;

/// Errors that can occur during rate limiting operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitError {
    /// No quota left in the current window (non-blocking acquire only)
    #[error("Rate limit exceeded")]
    Exceeded,

    #[error("Invalid rate limiter configuration: {0}")]
    InvalidConfig(&'static str),
}
