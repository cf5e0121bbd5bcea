//! Pre-configured limiters matching the published limits of market-data providers
//!
//! # Supported Providers
//!
//! - **CoinGecko**: public (keyless) and Demo API plans

pub mod coingecko;
