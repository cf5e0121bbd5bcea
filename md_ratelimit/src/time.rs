use std::time::Duration;

use tokio::time::Instant;

/// Monotonic clock for the limiters
///
/// Backed by tokio's `Instant` so that a paused test runtime drives it
/// together with `tokio::time::sleep`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TimeSource {
    epoch: Instant,
}

impl TimeSource {
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }

    /// Nanoseconds since this source was created
    #[inline(always)]
    pub fn now_nanos(&self) -> u64 {
        duration_to_nanos(self.epoch.elapsed())
    }
}

impl Default for TimeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
pub(crate) fn duration_to_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
