use md_http::HttpError;
use md_http::HttpErrorKind;
use md_types::MarketSnapshot;
use serde::Deserialize;
use serde::Serialize;

/// What a subscriber callback receives
///
/// Serialises as `{"type": "market_update" | "error" | "connection_status", "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum HubMessage {
    MarketUpdate(Vec<MarketSnapshot>),
    Error(FeedError),
    ConnectionStatus(bool),
}

impl HubMessage {
    pub fn is_market_update(&self) -> bool {
        matches!(self, HubMessage::MarketUpdate(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, HubMessage::Error(_))
    }
}

/// Owned, cloneable summary of a failed tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedError {
    pub kind: HttpErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&HttpError> for FeedError {
    fn from(err: &HttpError) -> Self {
        Self { kind: err.kind(), message: err.to_string(), status: err.status() }
    }
}
