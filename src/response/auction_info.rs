use crate::types::{Coins, TradeId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An auction as it appears in search results, the trade pile and the watchlist.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuctionInfo {
    #[serde(deserialize_with = "crate::serializers::number_or_string::deserialize")]
    pub trade_id: TradeId,
    #[serde(default)]
    pub buy_now_price: Option<Coins>,
    #[serde(default)]
    pub current_bid: Option<Coins>,
    #[serde(default)]
    pub starting_bid: Option<Coins>,
    /// Seconds until the auction ends. `-1` once it has ended.
    #[serde(default)]
    pub expires: Option<i64>,
    #[serde(default)]
    pub trade_state: Option<String>,
    #[serde(default)]
    pub item_data: Option<Value>,
    /// Fields not modeled here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `auctionInfo` list found in most responses.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuctionList {
    #[serde(default)]
    pub auction_info: Vec<AuctionInfo>,
}

impl AuctionList {
    /// Reads the auctions out of a response body.
    pub fn from_body(body: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(body)
    }
}
