//! # md_types
//!
//! Typed shapes of the CoinGecko responses consumed by the feed, plus the
//! polling parameters shared by the client and the hub.

pub mod coins;
pub mod markets;
pub mod nfts;
pub mod poll;

pub use coins::CoinDetail;
pub use coins::CoinListEntry;
pub use coins::TrendingCoin;
pub use coins::TrendingItem;
pub use coins::TrendingResponse;
pub use markets::MarketSnapshot;
pub use nfts::NftDetail;
pub use nfts::NftListEntry;
pub use poll::PollParams;
