use std::time::Duration;

use reqwest::Client;
use reqwest::ClientBuilder;

use crate::errors::Result;

const DEFAULT_USER_AGENT: &str = concat!("md_feed/", env!("CARGO_PKG_VERSION"));

/// Configuration for HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum idle connections per host (default: 8)
    pub pool_max_idle_per_host: usize,

    /// Idle timeout for pooled connections (default: 90s)
    pub pool_idle_timeout: Duration,

    /// Connection establishment timeout (default: 10s)
    pub connect_timeout: Duration,

    /// Total request timeout. `None` leaves requests unbounded (default).
    pub request_timeout: Option<Duration>,

    /// TCP keepalive interval (default: 60s)
    pub tcp_keepalive: Duration,

    /// Enable TCP_NODELAY (default: true)
    pub tcp_nodelay: bool,

    /// Accept gzip/brotli encoded bodies (default: true)
    pub compression: bool,

    /// Enable Hickory DNS for async resolution (default: true)
    pub hickory_dns: bool,

    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 8,
            pool_idle_timeout: Duration::from_secs(90),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            tcp_keepalive: Duration::from_secs(60),
            tcp_nodelay: true,
            compression: true,
            hickory_dns: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpClientConfig {
    /// Default configuration with a bound on the whole request
    pub fn with_request_timeout(timeout: Duration) -> Self {
        Self { request_timeout: Some(timeout), ..Default::default() }
    }
}

pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .tcp_nodelay(config.tcp_nodelay)
            .tcp_keepalive(Some(config.tcp_keepalive))
            .connect_timeout(config.connect_timeout)
            .use_rustls_tls()
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .user_agent(config.user_agent.clone())
            .gzip(config.compression)
            .brotli(config.compression)
            .hickory_dns(config.hickory_dns);

        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;

        Ok(Self { client, config })
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Create a GET request builder
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.pool_max_idle_per_host, 8);
        assert_eq!(config.request_timeout, None);
        assert!(config.tcp_nodelay);
        assert!(config.user_agent.starts_with("md_feed/"));
    }

    #[test]
    fn test_with_request_timeout() {
        let config = HttpClientConfig::with_request_timeout(Duration::from_secs(5));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
        assert!(config.hickory_dns);
    }

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }
}
