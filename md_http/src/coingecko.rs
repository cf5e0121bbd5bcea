use std::sync::Arc;

use md_ratelimit::RateLimiter;
use md_types::CoinDetail;
use md_types::CoinListEntry;
use md_types::MarketSnapshot;
use md_types::NftDetail;
use md_types::NftListEntry;
use md_types::TrendingCoin;
use md_types::TrendingResponse;
use md_types::poll::join_ids;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use tracing::warn;

use crate::client::HttpClient;
use crate::client::HttpClientConfig;
use crate::errors::HttpError;
use crate::errors::Result;
use crate::recent;

pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

const DEMO_API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Upper bound of `per_page` accepted by `/coins/markets`
pub const MAX_PER_PAGE: usize = 250;

/// CoinGecko REST client
///
/// Every request first passes the rate limiter, so callers may be suspended
/// before the request is sent.
pub struct CoinGeckoClient {
    client: HttpClient,
    base_url: String,
    rate_limiter: Arc<dyn RateLimiter>,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    /// Keyless client on the public API with the free-tier budget
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> CoinGeckoClientBuilder {
        CoinGeckoClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn rate_limiter(&self) -> &Arc<dyn RateLimiter> {
        &self.rate_limiter
    }

    /// GET `path` with `params` and return the raw JSON body
    pub async fn fetch_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        self.rate_limiter.acquire_one().await?;

        let url = self.url(path);
        debug!(%url, ?params, "GET");

        let mut request = self.client.get(&url).query(params);
        if let Some(key) = &self.api_key {
            request = request.header(DEMO_API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "upstream returned error status");
            return Err(HttpError::upstream(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(HttpError::Json)
    }

    /// GET `path` and decode the body into `T`
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let value = self.fetch_json(path, params).await?;
        serde_json::from_value(value).map_err(|source| HttpError::Schema { path: path.to_string(), source })
    }

    pub async fn trending(&self) -> Result<Vec<TrendingCoin>> {
        let response: TrendingResponse = self.fetch("/search/trending", &[]).await?;
        Ok(response.into_coins())
    }

    /// Market rows for the given ids, ordered by market cap
    pub async fn markets(&self, ids: &[String], vs_currency: &str) -> Result<Vec<MarketSnapshot>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids_param = join_ids(ids);
        let per_page = ids.len().clamp(1, MAX_PER_PAGE).to_string();
        self.fetch(
            "/coins/markets",
            &[
                ("vs_currency", vs_currency),
                ("ids", ids_param.as_str()),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
                ("price_change_percentage", "24h"),
            ],
        )
        .await
    }

    /// One page of the whole market, ordered by market cap
    pub async fn top_markets(&self, vs_currency: &str, per_page: usize, page: u32) -> Result<Vec<MarketSnapshot>> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE).to_string();
        let page = page.max(1).to_string();
        self.fetch(
            "/coins/markets",
            &[
                ("vs_currency", vs_currency),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", page.as_str()),
                ("sparkline", "false"),
                ("price_change_percentage", "24h"),
            ],
        )
        .await
    }

    pub async fn coin(&self, id: &str) -> Result<CoinDetail> {
        let path = format!("/coins/{id}");
        self.fetch(
            &path,
            &[("localization", "false"), ("tickers", "false"), ("community_data", "false"), ("developer_data", "false")],
        )
        .await
    }

    pub async fn coins_list(&self) -> Result<Vec<CoinListEntry>> {
        self.fetch("/coins/list", &[]).await
    }

    /// Newest listings by the trailing-number heuristic, see [`recent`]
    pub async fn recently_added(&self, limit: usize) -> Result<Vec<CoinListEntry>> {
        let coins = self.coins_list().await?;
        Ok(recent::select_recently_added(coins, limit))
    }

    pub async fn nft_list(&self, per_page: usize, page: u32) -> Result<Vec<NftListEntry>> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE).to_string();
        let page = page.max(1).to_string();
        self.fetch("/nfts/list", &[("per_page", per_page.as_str()), ("page", page.as_str())]).await
    }

    pub async fn nft(&self, id: &str) -> Result<NftDetail> {
        let path = format!("/nfts/{id}");
        self.fetch(&path, &[]).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

/// Builder for configuring the CoinGecko client
pub struct CoinGeckoClientBuilder {
    http_config: HttpClientConfig,
    base_url: String,
    rate_limiter: Option<Arc<dyn RateLimiter>>,
    api_key: Option<String>,
}

impl Default for CoinGeckoClientBuilder {
    fn default() -> Self {
        Self { http_config: HttpClientConfig::default(), base_url: COINGECKO_BASE_URL.to_string(), rate_limiter: None, api_key: None }
    }
}

impl CoinGeckoClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Replace the default gate. Share one limiter between clients that draw
    /// from the same upstream budget.
    pub fn rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Authenticate with a Demo plan key; raises the default budget to the Demo tier
    pub fn demo_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn build(self) -> Result<CoinGeckoClient> {
        let client = HttpClient::with_config(self.http_config)?;

        let rate_limiter = match (self.rate_limiter, &self.api_key) {
            (Some(limiter), _) => limiter,
            (None, Some(_)) => Arc::new(md_ratelimit::providers::coingecko::demo_tier()) as Arc<dyn RateLimiter>,
            (None, None) => Arc::new(md_ratelimit::providers::coingecko::free_tier()) as Arc<dyn RateLimiter>,
        };

        Ok(CoinGeckoClient { client, base_url: self.base_url, rate_limiter, api_key: self.api_key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_default() {
        let builder = CoinGeckoClientBuilder::default();
        assert_eq!(builder.base_url, COINGECKO_BASE_URL);
        assert!(builder.api_key.is_none());
    }

    #[test]
    fn test_default_budget_is_free_tier() {
        let client = CoinGeckoClient::new().unwrap();
        assert_eq!(client.rate_limiter().capacity(), 10);
    }

    #[test]
    fn test_demo_key_raises_budget() {
        let client = CoinGeckoClient::builder().demo_api_key("CG-test").build().unwrap();
        assert_eq!(client.rate_limiter().capacity(), 30);
    }

    #[test]
    fn test_url_joining() {
        let client = CoinGeckoClient::builder().base_url("http://localhost:1234/api/v3/").build().unwrap();
        assert_eq!(client.url("/coins/list"), "http://localhost:1234/api/v3/coins/list");
        assert_eq!(client.url("nfts/list"), "http://localhost:1234/api/v3/nfts/list");
    }
}
