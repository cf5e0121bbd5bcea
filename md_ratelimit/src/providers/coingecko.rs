//! CoinGecko rate limit presets
//!
//! CoinGecko counts calls per minute per IP (keyless) or per key (Demo).
//!
//! Reference: https://docs.coingecko.com/reference/common-errors-rate-limit

use std::time::Duration;

use crate::SlidingWindow;

/// Calls allowed per window on the keyless public API
pub const FREE_TIER_REQUESTS: u32 = 10;

/// Calls allowed per window with a Demo API key
pub const DEMO_TIER_REQUESTS: u32 = 30;

pub const WINDOW: Duration = Duration::from_secs(60);

/// Keyless public API: 10 calls per trailing minute
pub fn free_tier() -> SlidingWindow {
    SlidingWindow::new(FREE_TIER_REQUESTS, WINDOW)
}

/// Demo plan: 30 calls per trailing minute
pub fn demo_tier() -> SlidingWindow {
    SlidingWindow::new(DEMO_TIER_REQUESTS, WINDOW)
}
