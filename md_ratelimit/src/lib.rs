//! # md_ratelimit
//!
//! Request gates for upstream market-data APIs.

pub mod error;
pub mod limiter;
pub mod providers;
pub mod sliding_window;
mod time;

pub use error::RateLimitError;
pub use error::Result;
pub use limiter::RateLimiter;
pub use sliding_window::SlidingWindow;
pub use sliding_window::SlidingWindowBuilder;
