use std::time::Duration;

/// Default refresh period of a polled channel
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(30);

/// Default quote currency
pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// Comma separated id list, the format `/coins/markets` expects for `ids`
pub fn join_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(",")
}

/// What a polled channel fetches and how often
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollParams {
    pub coin_ids: Vec<String>,
    pub vs_currency: String,
    pub polling_interval: Duration,
}

impl PollParams {
    pub fn new<I, S>(coin_ids: I, vs_currency: &str, polling_interval: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { coin_ids: coin_ids.into_iter().map(Into::into).collect(), vs_currency: vs_currency.to_lowercase(), polling_interval }
    }

    pub fn ids_param(&self) -> String {
        join_ids(&self.coin_ids)
    }

    /// Canonical channel key for these parameters: `"<id>-<id>:<vs>"`
    ///
    /// Ids are sorted and deduplicated so that the same coin set maps to one channel.
    pub fn channel_key(&self) -> String {
        let mut ids: Vec<&str> = self.coin_ids.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids.dedup();
        format!("{}:{}", ids.join("-"), self.vs_currency)
    }
}

impl Default for PollParams {
    fn default() -> Self {
        Self { coin_ids: Vec::new(), vs_currency: DEFAULT_VS_CURRENCY.to_string(), polling_interval: DEFAULT_POLLING_INTERVAL }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_param() {
        let params = PollParams::new(["bitcoin", "ethereum"], "usd", Duration::from_secs(1));
        assert_eq!(params.ids_param(), "bitcoin,ethereum");
        assert_eq!(join_ids(&["solana"]), "solana");
        assert_eq!(join_ids::<&str>(&[]), "");
    }

    #[test]
    fn test_channel_key_is_order_insensitive() {
        let a = PollParams::new(["ethereum", "bitcoin", "bitcoin"], "USD", Duration::from_secs(1));
        let b = PollParams::new(["bitcoin", "ethereum"], "usd", Duration::from_secs(5));
        assert_eq!(a.channel_key(), "bitcoin-ethereum:usd");
        assert_eq!(a.channel_key(), b.channel_key());
    }

    #[test]
    fn test_default() {
        let params = PollParams::default();
        assert!(params.coin_ids.is_empty());
        assert_eq!(params.vs_currency, "usd");
        assert_eq!(params.polling_interval, DEFAULT_POLLING_INTERVAL);
    }
}
