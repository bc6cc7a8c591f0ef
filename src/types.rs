//! Types for common values in transfer market requests and responses.

/// An amount of coins.
pub type Coins = u32;
/// The ID of an auction on the transfer market.
pub type TradeId = u64;
/// The ID of an item owned by the user.
pub type ItemId = u64;
/// The ID of a squad.
pub type SquadId = u32;
/// A resource ID identifying an item definition. Special versions of a card carry a masked
/// resource ID which can be reduced to its base ID.
pub type ResourceId = u64;

// Types internally used by the crate.
use reqwest_middleware::ClientWithMiddleware;

pub(crate) type HttpClient = ClientWithMiddleware;
