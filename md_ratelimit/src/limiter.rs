use std::future::Future;
use std::pin::Pin;

use crate::error::Result;

/// Core trait for request gates sitting in front of an upstream API
pub trait RateLimiter: Send + Sync {
    /// Try to acquire `weight` request slots without waiting
    fn try_acquire(&self, weight: u32) -> Result<()>;

    fn try_acquire_one(&self) -> Result<()> {
        self.try_acquire(1)
    }

    /// Wait until `weight` slots are free, then take them
    fn acquire(&self, weight: u32) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    fn acquire_one(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        self.acquire(1)
    }

    /// Slots that can be taken right now
    fn available(&self) -> u32;

    /// Maximum slots per window
    fn capacity(&self) -> u32;

    /// Forget all recorded requests
    fn reset(&self);
}
