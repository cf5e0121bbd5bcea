//! # md_hub
//!
//! Polling broadcast hub: named channels, each backed by a polling task that
//! fans market snapshots out to its subscribers.

pub mod hub;
pub mod message;
pub mod source;

pub use hub::Callback;
pub use hub::MarketHub;
pub use hub::SubscriberId;
pub use message::FeedError;
pub use message::HubMessage;
pub use source::MarketSource;
pub use source::SourceFuture;
