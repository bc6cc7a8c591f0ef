//! Models for making requests.

mod search_filter;
mod trade_ref;

pub use search_filter::SearchFilter;
pub use trade_ref::TradeRef;
