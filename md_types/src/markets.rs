use serde::Deserialize;
use serde::Serialize;

/// One row of `/coins/markets`
///
/// Only `id`, `symbol` and `name` are guaranteed by the upstream API; every
/// numeric field may be `null` for thinly traded or freshly listed coins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub fully_diluted_valuation: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub high_24h: Option<f64>,
    #[serde(default)]
    pub low_24h: Option<f64>,
    #[serde(default)]
    pub price_change_24h: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_change_24h: Option<f64>,
    #[serde(default)]
    pub market_cap_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub max_supply: Option<f64>,
    #[serde(default)]
    pub ath: Option<f64>,
    #[serde(default)]
    pub atl: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl MarketSnapshot {
    /// Minimal snapshot with every optional field unset
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            image: None,
            current_price: None,
            market_cap: None,
            market_cap_rank: None,
            fully_diluted_valuation: None,
            total_volume: None,
            high_24h: None,
            low_24h: None,
            price_change_24h: None,
            price_change_percentage_24h: None,
            market_cap_change_24h: None,
            market_cap_change_percentage_24h: None,
            circulating_supply: None,
            total_supply: None,
            max_supply: None,
            ath: None,
            atl: None,
            last_updated: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    /// Width of the 24h range relative to the low, in percent
    pub fn range_24h_pct(&self) -> Option<f64> {
        let (high, low) = (self.high_24h?, self.low_24h?);
        if low <= 0.0 {
            return None;
        }
        Some((high - low) / low * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_markets_row() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 67187.0,
            "market_cap": 1317802988326.0,
            "market_cap_rank": 1,
            "total_volume": 31260929299.0,
            "high_24h": 68000.0,
            "low_24h": 66000.0,
            "price_change_percentage_24h": 0.56,
            "max_supply": 21000000.0,
            "roi": null,
            "last_updated": "2024-04-07T16:49:31.736Z"
        }"#;

        let snapshot: MarketSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.id, "bitcoin");
        assert_eq!(snapshot.market_cap_rank, Some(1));
        assert_eq!(snapshot.current_price, Some(67187.0));
        assert_eq!(snapshot.total_supply, None);
    }

    #[test]
    fn test_nullable_numbers() {
        let json = r#"{"id":"x","symbol":"x","name":"X","current_price":null,"market_cap_rank":null}"#;
        let snapshot: MarketSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.current_price, None);
        assert_eq!(snapshot.market_cap_rank, None);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let json = r#"{"symbol":"x","name":"X"}"#;
        assert!(serde_json::from_str::<MarketSnapshot>(json).is_err());
    }

    #[test]
    fn test_range_24h_pct() {
        let mut snapshot = MarketSnapshot::new("bitcoin", "btc", "Bitcoin");
        assert_eq!(snapshot.range_24h_pct(), None);

        snapshot.high_24h = Some(110.0);
        snapshot.low_24h = Some(100.0);
        let pct = snapshot.range_24h_pct().unwrap();
        assert!((pct - 10.0).abs() < 1e-9);
    }
}
