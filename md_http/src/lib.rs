//! # md_http
//!
//! Rate-limited CoinGecko REST client and the local JSON cache used in front of it.

pub mod cache;
pub mod client;
pub mod coingecko;
pub mod errors;
pub mod recent;

pub use cache::CacheError;
pub use cache::JsonCache;
pub use client::HttpClient;
pub use client::HttpClientConfig;
pub use coingecko::CoinGeckoClient;
pub use coingecko::CoinGeckoClientBuilder;
pub use errors::HttpError;
pub use errors::HttpErrorKind;
pub use errors::Result;
