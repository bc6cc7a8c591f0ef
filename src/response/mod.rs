//! Models for responses.

mod auction_info;

pub use auction_info::{AuctionInfo, AuctionList};
