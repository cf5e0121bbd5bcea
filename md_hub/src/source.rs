use std::future::Future;
use std::pin::Pin;

use md_http::CoinGeckoClient;
use md_types::MarketSnapshot;
use md_types::PollParams;

pub type SourceFuture<'a> = Pin<Box<dyn Future<Output = md_http::Result<Vec<MarketSnapshot>>> + Send + 'a>>;

/// Where a polled channel gets its snapshots from
pub trait MarketSource: Send + Sync {
    fn fetch_markets<'a>(&'a self, params: &'a PollParams) -> SourceFuture<'a>;
}

impl MarketSource for CoinGeckoClient {
    fn fetch_markets<'a>(&'a self, params: &'a PollParams) -> SourceFuture<'a> {
        Box::pin(self.markets(&params.coin_ids, &params.vs_currency))
    }
}
