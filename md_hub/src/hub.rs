use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Weak;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use md_types::PollParams;
use parking_lot::Mutex;
use parking_lot::ReentrantMutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::message::FeedError;
use crate::message::HubMessage;
use crate::source::MarketSource;

/// Shortest accepted polling period
pub const MIN_POLLING_INTERVAL: Duration = Duration::from_millis(100);

pub type Callback = Arc<dyn Fn(&HubMessage) + Send + Sync>;

/// Handle returned by [`MarketHub::subscribe`], used to unsubscribe one callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct Subscriber {
    id: SubscriberId,
    callback: Callback,
    /// Held for the whole duration of a callback; `false` once removed from the hub
    active: ReentrantMutex<Cell<bool>>,
}

impl Subscriber {
    fn new(id: SubscriberId, callback: Callback) -> Self {
        Self { id, callback, active: ReentrantMutex::new(Cell::new(true)) }
    }

    fn notify(&self, message: &HubMessage) {
        let active = self.active.lock();
        if active.get() {
            (self.callback)(message);
        }
    }

    /// Stop deliveries. Blocks while another thread is inside the callback; the
    /// callback's own thread may retire it re-entrantly.
    fn retire(&self) {
        self.active.lock().set(false);
    }

    /// Retire and hand over one final message
    fn retire_with(&self, message: &HubMessage) {
        let active = self.active.lock();
        if active.replace(false) {
            (self.callback)(message);
        }
    }
}

struct Channel {
    /// Distinguishes this channel from an older one registered under the same key
    generation: u64,
    params: PollParams,
    subscribers: Vec<Arc<Subscriber>>,
    poller: JoinHandle<()>,
}

#[derive(Default)]
struct HubState {
    channels: HashMap<String, Channel>,
    connected: bool,
}

impl HubState {
    fn all_subscribers(&self) -> Vec<Arc<Subscriber>> {
        self.channels.values().flat_map(|channel| channel.subscribers.iter().cloned()).collect()
    }
}

struct HubInner {
    source: Arc<dyn MarketSource>,
    state: Mutex<HubState>,
    next_id: AtomicU64,
}

impl HubInner {
    /// Deliver to the current subscribers of `key`, in subscription order
    ///
    /// Dropped when the channel is gone or was re-created since `generation`.
    /// Subscribers removed while the delivery is under way are skipped.
    fn deliver(&self, key: &str, generation: u64, message: &HubMessage) {
        let subscribers: Vec<Arc<Subscriber>> = {
            let state = self.state.lock();
            match state.channels.get(key) {
                Some(channel) if channel.generation == generation => channel.subscribers.clone(),
                _ => {
                    debug!(channel = key, "dropping message for torn down channel");
                    return;
                }
            }
        };

        broadcast(&subscribers, message);
    }
}

impl Drop for HubInner {
    fn drop(&mut self) {
        for channel in self.state.get_mut().channels.values() {
            channel.poller.abort();
        }
    }
}

/// Simulated push feed over a pull API
///
/// Each channel owns one polling task that fetches from the [`MarketSource`]
/// and fans the result out to the channel's subscribers. Construct one hub and
/// share it (`Arc<MarketHub>`) with everything that subscribes.
///
/// Callbacks run outside the registry lock and may call back into the hub.
/// Once `unsubscribe` or `disconnect` returns, the removed callbacks are not
/// running and are never called again; both wait for a callback that is
/// running on another thread at the time.
pub struct MarketHub {
    inner: Arc<HubInner>,
}

impl MarketHub {
    pub fn new(source: Arc<dyn MarketSource>) -> Self {
        Self { inner: Arc::new(HubInner { source, state: Mutex::new(HubState::default()), next_id: AtomicU64::new(1) }) }
    }

    /// Register `callback` on channel `key`
    ///
    /// The first subscriber of a key creates the channel with `params`, starts
    /// its polling task (first fetch immediately) and announces
    /// `connection_status: true` to every subscriber of the hub. Later
    /// subscribers join the running channel; their `params` are ignored.
    ///
    /// # Panics
    /// Must be called from within a Tokio runtime.
    pub fn subscribe<F>(&self, key: impl Into<String>, callback: F, params: PollParams) -> SubscriberId
    where
        F: Fn(&HubMessage) + Send + Sync + 'static,
    {
        let key = key.into();
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let subscriber = Arc::new(Subscriber::new(id, Arc::new(callback)));

        let announce = {
            let mut state = self.inner.state.lock();
            if let Some(channel) = state.channels.get_mut(&key) {
                if channel.params != params {
                    debug!(channel = %key, "channel already polling, keeping parameters of first subscriber");
                }
                channel.subscribers.push(subscriber);
                debug!(channel = %key, subscribers = channel.subscribers.len(), "subscriber added");
                None
            } else {
                let params = normalise(params);
                let generation = id.0;
                let poller = spawn_poller(Arc::downgrade(&self.inner), key.clone(), generation, params.clone());
                info!(channel = %key, coins = %params.ids_param(), vs = %params.vs_currency, interval_ms = params.polling_interval.as_millis() as u64, "channel started");

                state.channels.insert(key, Channel { generation, params, subscribers: vec![subscriber], poller });
                state.connected = true;
                Some(state.all_subscribers())
            }
        };

        if let Some(subscribers) = announce {
            broadcast(&subscribers, &HubMessage::ConnectionStatus(true));
        }

        id
    }

    /// Remove one subscriber (`Some(id)`) or all of them (`None`) from `key`
    ///
    /// Removing the last subscriber stops the channel's polling task, including
    /// a fetch that is still in flight. Unknown keys and ids are ignored.
    pub fn unsubscribe(&self, key: &str, id: Option<SubscriberId>) {
        let removed = {
            let mut state = self.inner.state.lock();
            let Some(channel) = state.channels.get_mut(key) else {
                return;
            };

            let removed: Vec<Arc<Subscriber>> = match id {
                Some(id) => {
                    let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut channel.subscribers).into_iter().partition(|s| s.id == id);
                    channel.subscribers = kept;
                    removed
                }
                None => std::mem::take(&mut channel.subscribers),
            };

            if channel.subscribers.is_empty() {
                if let Some(channel) = state.channels.remove(key) {
                    channel.poller.abort();
                    info!(channel = key, "channel stopped");
                }
            }
            removed
        };

        for subscriber in &removed {
            subscriber.retire();
        }
    }

    /// Mark the hub connected and tell every subscriber
    pub fn connect(&self) {
        let subscribers = {
            let mut state = self.inner.state.lock();
            state.connected = true;
            state.all_subscribers()
        };
        broadcast(&subscribers, &HubMessage::ConnectionStatus(true));
    }

    /// Stop every channel and clear the registry
    ///
    /// Everyone subscribed at the time of the call receives
    /// `connection_status: false` once and nothing afterwards.
    pub fn disconnect(&self) {
        let subscribers: Vec<Arc<Subscriber>> = {
            let mut state = self.inner.state.lock();
            state.connected = false;
            state
                .channels
                .drain()
                .flat_map(|(_, channel)| {
                    channel.poller.abort();
                    channel.subscribers
                })
                .collect()
        };

        info!(subscribers = subscribers.len(), "hub disconnected");
        let goodbye = HubMessage::ConnectionStatus(false);
        for subscriber in &subscribers {
            subscriber.retire_with(&goodbye);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.inner.state.lock().connected
    }

    /// Number of channels with a running polling task
    pub fn channel_count(&self) -> usize {
        self.inner.state.lock().channels.len()
    }

    pub fn subscriber_count(&self, key: &str) -> usize {
        self.inner.state.lock().channels.get(key).map_or(0, |channel| channel.subscribers.len())
    }

    /// Parameters the channel is polling with
    pub fn channel_params(&self, key: &str) -> Option<PollParams> {
        self.inner.state.lock().channels.get(key).map(|channel| channel.params.clone())
    }
}

fn broadcast(subscribers: &[Arc<Subscriber>], message: &HubMessage) {
    for subscriber in subscribers {
        subscriber.notify(message);
    }
}

fn normalise(mut params: PollParams) -> PollParams {
    if params.polling_interval < MIN_POLLING_INTERVAL {
        warn!(requested_ms = params.polling_interval.as_millis() as u64, "polling interval too short, raising to minimum");
        params.polling_interval = MIN_POLLING_INTERVAL;
    }
    params
}

/// One task per channel; ticks never overlap
///
/// The fetch is awaited inside the loop, and ticks missed while it runs are
/// skipped rather than bunched up.
fn spawn_poller(hub: Weak<HubInner>, key: String, generation: u64, params: PollParams) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(params.polling_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let Some(source) = hub.upgrade().map(|inner| Arc::clone(&inner.source)) else {
                break;
            };

            let message = match source.fetch_markets(&params).await {
                Ok(snapshots) => {
                    debug!(channel = %key, rows = snapshots.len(), "market update");
                    HubMessage::MarketUpdate(snapshots)
                }
                Err(err) => {
                    warn!(channel = %key, "market fetch failed: {err}");
                    HubMessage::Error(FeedError::from(&err))
                }
            };

            let Some(inner) = hub.upgrade() else {
                break;
            };
            inner.deliver(&key, generation, &message);
        }
    })
}
