use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// Entry of `/coins/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinListEntry {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

/// Body of `/search/trending`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingResponse {
    pub coins: Vec<TrendingItem>,
}

impl TrendingResponse {
    /// Unwrap the `{"item": ...}` envelope
    pub fn into_coins(self) -> Vec<TrendingCoin> {
        self.coins.into_iter().map(|wrapper| wrapper.item).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingItem {
    pub item: TrendingCoin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub id: String,
    #[serde(default)]
    pub coin_id: Option<u64>,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub price_btc: Option<f64>,
    #[serde(default)]
    pub score: Option<u32>,
}

/// Body of `/coins/{id}` with localization, tickers, community and developer data disabled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<CoinDescription>,
    #[serde(default)]
    pub image: Option<CoinImage>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub genesis_date: Option<String>,
    #[serde(default)]
    pub categories: Vec<Option<String>>,
    #[serde(default)]
    pub market_data: Option<CoinMarketData>,
}

impl CoinDetail {
    /// Current price in the given quote currency, if reported
    pub fn price_in(&self, vs_currency: &str) -> Option<f64> {
        self.market_data.as_ref()?.current_price.get(&vs_currency.to_lowercase()).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDescription {
    #[serde(default)]
    pub en: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinImage {
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinMarketData {
    #[serde(default)]
    pub current_price: BTreeMap<String, f64>,
    #[serde(default)]
    pub market_cap: BTreeMap<String, f64>,
    #[serde(default)]
    pub total_volume: BTreeMap<String, f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trending_envelope() {
        let json = r#"{
            "coins": [
                {"item": {"id": "pepe", "coin_id": 29850, "name": "Pepe", "symbol": "PEPE", "market_cap_rank": 30, "score": 0}},
                {"item": {"id": "bonk", "name": "Bonk", "symbol": "BONK"}}
            ],
            "nfts": [],
            "categories": []
        }"#;

        let trending: TrendingResponse = serde_json::from_str(json).unwrap();
        let coins = trending.into_coins();
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[0].id, "pepe");
        assert_eq!(coins[0].market_cap_rank, Some(30));
        assert_eq!(coins[1].coin_id, None);
    }

    #[test]
    fn test_coin_detail_price_in() {
        let json = r#"{
            "id": "ethereum",
            "symbol": "eth",
            "name": "Ethereum",
            "description": {"en": "Smart contract platform"},
            "categories": ["Smart Contract Platform", null],
            "market_data": {"current_price": {"usd": 3400.5, "eur": 3100.0}}
        }"#;

        let detail: CoinDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.price_in("USD"), Some(3400.5));
        assert_eq!(detail.price_in("jpy"), None);
        assert_eq!(detail.categories.len(), 2);
    }

    #[test]
    fn test_coin_list_entry_tolerates_missing_names() {
        let entries: Vec<CoinListEntry> = serde_json::from_str(r#"[{"id":"abc2"},{"id":"xyz10","symbol":"xyz","name":"Xyz"}]"#).unwrap();
        assert_eq!(entries[0].symbol, "");
        assert_eq!(entries[1].name, "Xyz");
    }
}
