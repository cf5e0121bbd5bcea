use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// How often [`wait`] looks at the running flag
pub const POLL_EVERY: Duration = Duration::from_millis(100);

/// Install a Ctrl+C handler and return the flag it clears
pub fn install() -> Result<Arc<AtomicBool>, ctrlc::Error> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        tracing::info!("Shutdown signal received");
        flag.store(false, Ordering::Relaxed);
    })?;
    Ok(running)
}

/// Park the current task until `running` goes false
pub async fn wait(running: &AtomicBool) {
    let mut ticker = tokio::time::interval(POLL_EVERY);
    while running.load(Ordering::Relaxed) {
        ticker.tick().await;
    }
}
