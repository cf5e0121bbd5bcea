use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::RateLimitError;
use crate::error::Result;
use crate::limiter::RateLimiter;
use crate::time::TimeSource;
use crate::time::duration_to_nanos;

/// Ordered log of admission timestamps (nanoseconds, oldest first)
///
/// After every prune all entries satisfy `now - window < t <= now`.
#[derive(Debug)]
pub(crate) struct WindowLog {
    stamps: VecDeque<u64>,
    limit: u32,
    window_nanos: u64,
}

impl WindowLog {
    pub(crate) fn new(limit: u32, window_nanos: u64) -> Self {
        Self { stamps: VecDeque::with_capacity(limit as usize), limit, window_nanos }
    }

    fn prune(&mut self, now: u64) {
        while let Some(&oldest) = self.stamps.front() {
            if now.saturating_sub(oldest) >= self.window_nanos {
                self.stamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Record `weight` admissions at `now`, or report how long until they fit
    ///
    /// The wait is driven by the entry that has to expire last for `weight`
    /// slots to open up; with `weight == 1` that is the oldest entry.
    pub(crate) fn try_record(&mut self, now: u64, weight: u32) -> std::result::Result<(), u64> {
        self.prune(now);

        let len = self.stamps.len();
        let weight = weight as usize;
        if len + weight <= self.limit as usize {
            for _ in 0..weight {
                self.stamps.push_back(now);
            }
            return Ok(());
        }

        let blocking = self.stamps[len + weight - self.limit as usize - 1];
        Err(self.window_nanos - now.saturating_sub(blocking))
    }

    pub(crate) fn available(&mut self, now: u64) -> u32 {
        self.prune(now);
        self.limit - self.stamps.len() as u32
    }

    fn clear(&mut self) {
        self.stamps.clear();
    }
}

/// Sliding-log rate limiter
///
/// Admits at most `limit` requests in any trailing `window`. Unlike a fixed
/// window there is no reset boundary: a full log frees a slot exactly when
/// its oldest timestamp leaves the window.
pub struct SlidingWindow {
    log: Mutex<WindowLog>,

    limit: u32,

    window: Duration,

    time_source: TimeSource,
}

impl SlidingWindow {
    /// Create a new sliding window limiter
    ///
    /// # Panics
    /// Panics if `limit` is 0 or `window` is zero. Use [`SlidingWindow::try_new`]
    /// for values coming from configuration.
    pub fn new(limit: u32, window: Duration) -> Self {
        assert!(limit > 0, "Limit must be greater than 0");
        assert!(!window.is_zero(), "Window duration must be greater than 0");
        Self::build(limit, window)
    }

    pub fn try_new(limit: u32, window: Duration) -> Result<Self> {
        if limit == 0 {
            return Err(RateLimitError::InvalidConfig("limit must be greater than 0"));
        }
        if window.is_zero() {
            return Err(RateLimitError::InvalidConfig("window must be greater than 0"));
        }
        Ok(Self::build(limit, window))
    }

    fn build(limit: u32, window: Duration) -> Self {
        Self { log: Mutex::new(WindowLog::new(limit, duration_to_nanos(window))), limit, window, time_source: TimeSource::new() }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    pub fn builder() -> SlidingWindowBuilder {
        SlidingWindowBuilder::new()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Wait for a free slot and record it. Never fails.
    pub async fn admit(&self) {
        // limit >= 1 always holds, so a single slot is always admissible
        let _ = self.wait_for(1).await;
    }

    /// Time until one slot frees up, zero if one is free now
    pub fn next_slot_in(&self) -> Duration {
        let now = self.time_source.now_nanos();
        let mut log = self.log.lock();
        log.prune(now);
        if log.stamps.len() < self.limit as usize {
            return Duration::ZERO;
        }
        let oldest = log.stamps.front().copied().unwrap_or(now);
        Duration::from_nanos(log.window_nanos - now.saturating_sub(oldest))
    }

    async fn wait_for(&self, weight: u32) -> Result<()> {
        if weight > self.limit {
            return Err(RateLimitError::InvalidConfig("weight exceeds limiter capacity"));
        }
        if weight == 0 {
            return Ok(());
        }

        loop {
            // The lock is released before sleeping; the log is re-checked on wake
            // because other callers may have taken the slot in the meantime.
            let wait_nanos = {
                let now = self.time_source.now_nanos();
                let mut log = self.log.lock();
                match log.try_record(now, weight) {
                    Ok(()) => return Ok(()),
                    Err(wait) => wait,
                }
            };

            debug!(wait_ms = wait_nanos / 1_000_000, limit = self.limit, "rate budget exhausted, delaying request");
            tokio::time::sleep(Duration::from_nanos(wait_nanos)).await;
        }
    }
}

impl RateLimiter for SlidingWindow {
    fn try_acquire(&self, weight: u32) -> Result<()> {
        if weight == 0 {
            return Ok(());
        }
        if weight > self.limit {
            return Err(RateLimitError::InvalidConfig("weight exceeds limiter capacity"));
        }
        let now = self.time_source.now_nanos();
        self.log.lock().try_record(now, weight).map_err(|_| RateLimitError::Exceeded)
    }

    fn acquire(&self, weight: u32) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(self.wait_for(weight))
    }

    fn available(&self) -> u32 {
        let now = self.time_source.now_nanos();
        self.log.lock().available(now)
    }

    fn capacity(&self) -> u32 {
        self.limit
    }

    fn reset(&self) {
        self.log.lock().clear();
    }
}

/// Builder for configuring a sliding window limiter
pub struct SlidingWindowBuilder {
    limit: Option<u32>,
    window: Option<Duration>,
}

impl SlidingWindowBuilder {
    pub fn new() -> Self {
        Self { limit: None, window: None }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn window(mut self, window: Duration) -> Self {
        self.window = Some(window);
        self
    }

    pub fn per_second(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self.window = Some(Duration::from_secs(1));
        self
    }

    pub fn per_minute(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self.window = Some(Duration::from_secs(60));
        self
    }

    pub fn build(self) -> Result<SlidingWindow> {
        let limit = self.limit.ok_or(RateLimitError::InvalidConfig("limit must be set"))?;
        let window = self.window.ok_or(RateLimitError::InvalidConfig("window must be set"))?;
        SlidingWindow::try_new(limit, window)
    }
}

impl Default for SlidingWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
