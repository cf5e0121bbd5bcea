use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use md_http::CoinGeckoClient;
use md_http::HttpClientConfig;
use md_http::HttpError;
use md_ratelimit::RateLimitError;
use md_ratelimit::RateLimiter;
use md_ratelimit::SlidingWindow;
use md_types::poll::DEFAULT_VS_CURRENCY;
use serde::Deserialize;
use tracing::Level;

pub const DEFAULT_CONFIG_PATH: &str = "config/md_feed.toml";

/// Prefix of the environment overrides, e.g. `MD_FEED_MAX_REQUESTS=30`
pub const ENV_PREFIX: &str = "MD_FEED";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    /// Demo plan key sent as `x-cg-demo-api-key`
    pub demo_api_key: Option<String>,
    pub max_requests: u32,
    pub window_ms: u64,
    pub vs_currency: String,
    pub polling_interval_ms: u64,
    pub request_timeout_ms: Option<u64>,
    pub cache_dir: String,
    pub log_dir: String,
    pub log_level: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: md_http::coingecko::COINGECKO_BASE_URL.to_string(),
            demo_api_key: None,
            max_requests: md_ratelimit::providers::coingecko::FREE_TIER_REQUESTS,
            window_ms: 60_000,
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            polling_interval_ms: 30_000,
            request_timeout_ms: None,
            cache_dir: "cache".to_string(),
            log_dir: "logs".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl FeedConfig {
    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.polling_interval_ms)
    }

    /// Configured level, INFO when the string is not a level name
    pub fn level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }

    pub fn rate_limiter(&self) -> Result<SlidingWindow, RateLimitError> {
        SlidingWindow::try_new(self.max_requests, Duration::from_millis(self.window_ms))
    }

    /// Client with the configured budget, endpoint, key and timeout
    pub fn client(&self) -> Result<CoinGeckoClient, HttpError> {
        let limiter: Arc<dyn RateLimiter> = Arc::new(self.rate_limiter()?);
        let http_config = match self.request_timeout_ms {
            Some(ms) => HttpClientConfig::with_request_timeout(Duration::from_millis(ms)),
            None => HttpClientConfig::default(),
        };

        let mut builder = CoinGeckoClient::builder().base_url(&self.base_url).http_config(http_config).rate_limiter(limiter);
        if let Some(key) = &self.demo_api_key {
            builder = builder.demo_api_key(key);
        }
        builder.build()
    }
}

/// Layer the TOML file (when it exists) under `MD_FEED_*` environment overrides
pub fn load_feed_config<P: AsRef<Path>>(path: P) -> Result<FeedConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?;

    config.try_deserialize()
}

/// Load the feed config with fallback to defaults
pub fn load_feed_config_or_default<P: AsRef<Path>>(path: P) -> FeedConfig {
    let path = path.as_ref();
    match load_feed_config(path) {
        Ok(config) => {
            tracing::info!("Loaded feed config from {}", path.display());
            config
        }
        Err(err) => {
            tracing::warn!("Failed to load feed config from {}: {}. Using defaults.", path.display(), err);
            FeedConfig::default()
        }
    }
}
