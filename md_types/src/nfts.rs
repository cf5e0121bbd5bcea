use serde::Deserialize;
use serde::Serialize;

/// Entry of `/nfts/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftListEntry {
    pub id: String,
    #[serde(default)]
    pub contract_address: Option<String>,
    pub name: String,
    #[serde(default)]
    pub asset_platform_id: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Body of `/nfts/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub asset_platform_id: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub floor_price: Option<NativeUsd>,
    #[serde(default)]
    pub market_cap: Option<NativeUsd>,
    #[serde(default)]
    pub volume_24h: Option<NativeUsd>,
    #[serde(default)]
    pub floor_price_in_usd_24h_percentage_change: Option<f64>,
    #[serde(default)]
    pub number_of_unique_addresses: Option<u64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
}

/// Value quoted both in the collection's native currency and in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NativeUsd {
    #[serde(default)]
    pub native_currency: Option<f64>,
    #[serde(default)]
    pub usd: Option<f64>,
}
