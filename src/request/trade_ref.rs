use crate::response::AuctionInfo;
use crate::types::TradeId;

/// Refers to an auction, either by its trade ID or by an auction from a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeRef(pub TradeId);

impl From<TradeId> for TradeRef {
    fn from(trade_id: TradeId) -> Self {
        Self(trade_id)
    }
}

impl From<&AuctionInfo> for TradeRef {
    fn from(auction: &AuctionInfo) -> Self {
        Self(auction.trade_id)
    }
}
