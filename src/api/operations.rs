//! Builds the request for each operation. Validation happens here so that nothing is sent for
//! invalid parameters.

use super::{urls, RequestSpec};
use crate::enums::{HttpMethod, ListingDuration};
use crate::error::{Error, ParameterError};
use crate::price::Price;
use crate::request::{SearchFilter, TradeRef};
use crate::types::{Coins, ItemId, SquadId, TradeId};
use serde::Serialize;

#[derive(Serialize)]
struct Id {
    id: u64,
}

#[derive(Serialize)]
struct PileItem {
    pile: &'static str,
    id: ItemId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveItems {
    item_data: [PileItem; 1],
}

pub fn get_credits() -> RequestSpec {
    RequestSpec::get(urls::CREDITS)
}

pub fn get_tradepile() -> RequestSpec {
    RequestSpec::get(urls::TRADEPILE)
}

pub fn get_watchlist() -> RequestSpec {
    RequestSpec::get(urls::WATCHLIST)
}

pub fn get_pilesize() -> RequestSpec {
    RequestSpec::get(urls::PILESIZE)
}

pub fn relist() -> RequestSpec {
    RequestSpec::with_method(HttpMethod::Put, urls::RELIST)
}

pub fn get_squads() -> RequestSpec {
    RequestSpec::get(urls::SQUAD_LIST)
}

pub fn get_squad_details(squad_id: SquadId) -> RequestSpec {
    RequestSpec::get(urls::squad_details(squad_id))
}

pub fn search(filter: &SearchFilter) -> RequestSpec {
    RequestSpec {
        query: filter.to_query(),
        ..RequestSpec::get(urls::TRANSFERMARKET)
    }
}

pub fn place_bid(trade: TradeRef, bid: Coins) -> Result<RequestSpec, Error> {
    #[derive(Serialize)]
    struct Bid {
        bid: Price,
    }

    let bid = Price::try_from(bid)?;
    let TradeRef(trade_id) = trade;

    if trade_id == 0 {
        return Err(ParameterError::InvalidTradeId(trade_id).into());
    }

    let request = RequestSpec::with_method(HttpMethod::Put, urls::place_bid(trade_id))
        .json(&Bid { bid })?;

    Ok(request)
}

pub fn list_item(
    item_id: ItemId,
    starting_bid: Coins,
    buy_now_price: Coins,
    duration: u32,
) -> Result<RequestSpec, Error> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ListItem {
        duration: ListingDuration,
        item_data: Id,
        buy_now_price: Price,
        starting_bid: Price,
    }

    let duration = ListingDuration::try_from(duration)
        .map_err(|_| ParameterError::InvalidDuration(duration))?;
    let (starting_bid, buy_now_price) = match (Price::try_from(starting_bid), Price::try_from(buy_now_price)) {
        (Ok(starting_bid), Ok(buy_now_price)) => (starting_bid, buy_now_price),
        _ => return Err(ParameterError::InvalidListingPrice.into()),
    };
    let request = RequestSpec::with_method(HttpMethod::Post, urls::LIST_ITEM)
        .json(&ListItem {
            duration,
            item_data: Id { id: item_id },
            buy_now_price,
            starting_bid,
        })?;

    Ok(request)
}

pub fn get_status(trade_ids: &[TradeId]) -> Result<RequestSpec, Error> {
    if trade_ids.is_empty() {
        return Err(ParameterError::NoTradeIds.into());
    }

    let trade_ids = trade_ids
        .iter()
        .map(|trade_id| trade_id.to_string())
        .collect::<Vec<_>>()
        .join(",");

    Ok(RequestSpec::get(urls::STATUS).query("tradeIds", trade_ids))
}

pub fn add_to_watchlist(trade_id: TradeId) -> Result<RequestSpec, Error> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Watch {
        auction_info: [Id; 1],
    }

    let request = RequestSpec::with_method(HttpMethod::Put, urls::WATCHLIST)
        .query("tradeId", trade_id)
        .json(&Watch {
            auction_info: [Id { id: trade_id }],
        })?;

    Ok(request)
}

pub fn remove_from_watchlist(trade_id: TradeId) -> RequestSpec {
    RequestSpec::with_method(HttpMethod::Delete, urls::WATCHLIST)
        .query("tradeId", trade_id)
}

pub fn remove_from_tradepile(trade_id: TradeId) -> RequestSpec {
    RequestSpec::with_method(HttpMethod::Delete, urls::remove_from_tradepile(trade_id))
}

fn move_item(item_id: ItemId, pile: &'static str) -> Result<RequestSpec, Error> {
    let request = RequestSpec::with_method(HttpMethod::Put, urls::ITEM)
        .json(&MoveItems {
            item_data: [PileItem { pile, id: item_id }],
        })?;

    Ok(request)
}

pub fn send_to_tradepile(item_id: ItemId) -> Result<RequestSpec, Error> {
    move_item(item_id, "trade")
}

pub fn send_to_club(item_id: ItemId) -> Result<RequestSpec, Error> {
    move_item(item_id, "club")
}

pub fn quick_sell(item_id: ItemId) -> RequestSpec {
    RequestSpec::with_method(HttpMethod::Delete, urls::item(item_id))
}

pub fn delete_sold_from_tradepile() -> RequestSpec {
    RequestSpec::with_method(HttpMethod::Delete, urls::SOLD)
}
