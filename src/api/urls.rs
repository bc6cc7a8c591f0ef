//! Paths relative to the session's API URL.

use crate::types::{ItemId, SquadId, TradeId};

pub const CREDITS: &str = "user/credits";
pub const TRADEPILE: &str = "tradepile";
pub const WATCHLIST: &str = "watchlist";
pub const PILESIZE: &str = "clientdata/pileSize";
pub const RELIST: &str = "auctionhouse/relist";
pub const SQUAD_LIST: &str = "squad/list";
pub const TRANSFERMARKET: &str = "transfermarket";
pub const LIST_ITEM: &str = "auctionhouse";
pub const STATUS: &str = "trade/status";
pub const ITEM: &str = "item";
pub const SOLD: &str = "trade/sold";

pub fn squad_details(squad_id: SquadId) -> String {
    format!("squad/{squad_id}")
}

pub fn place_bid(trade_id: TradeId) -> String {
    format!("trade/{trade_id}/bid")
}

pub fn remove_from_tradepile(trade_id: TradeId) -> String {
    format!("trade/{trade_id}")
}

pub fn item(item_id: ItemId) -> String {
    format!("{ITEM}/{item_id}")
}
