//! Bid and listing price rules.
//!
//! Prices on the transfer market must land on a step which depends on the magnitude of the
//! price. Between 0 and 1,000 coins prices move in steps of 50, between 1,000 and 10,000 in steps
//! of 100, and so on. None of these functions require a session.

use crate::error::ParameterError;
use crate::types::Coins;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The lowest price.
pub const MIN_PRICE: Coins = 0;
/// The highest price accepted by the transfer market.
pub const MAX_PRICE: Coins = 15_000_000;

/// `(threshold, step)` pairs in ascending order. A band covers prices from its threshold
/// (inclusive) up to the next band's threshold (exclusive).
const PRICE_BANDS: [(Coins, Coins); 5] = [
    (0, 50),
    (1_000, 100),
    (10_000, 250),
    (50_000, 500),
    (100_000, 1_000),
];

/// Gets the band which `price` falls in.
fn band(price: Coins) -> (Coins, Coins) {
    PRICE_BANDS
        .iter()
        .rev()
        .find(|(threshold, _)| price >= *threshold)
        .copied()
        .unwrap_or(PRICE_BANDS[0])
}

/// The highest valid price which is not above `price`.
fn floor_valid_price(price: Coins) -> Coins {
    if price >= MAX_PRICE {
        return MAX_PRICE;
    }

    let (threshold, step) = band(price);

    threshold + (price - threshold) / step * step
}

/// Checks whether `price` is a price the transfer market accepts.
pub fn is_price_valid(price: Coins) -> bool {
    if price > MAX_PRICE {
        return false;
    }

    let (threshold, step) = band(price);

    (price - threshold) % step == 0
}

/// The next valid price below `price`. Stays at [`MIN_PRICE`] when there is no lower price.
pub fn calculate_next_lower_price(price: Coins) -> Coins {
    if price <= MIN_PRICE {
        return MIN_PRICE;
    }

    if price > MAX_PRICE {
        return MAX_PRICE;
    }

    floor_valid_price(price - 1)
}

/// The next valid price above `price`. Stays at [`MAX_PRICE`] when there is no higher price.
pub fn calculate_next_higher_price(price: Coins) -> Coins {
    if price >= MAX_PRICE {
        return MAX_PRICE;
    }

    let lower = floor_valid_price(price);
    let (_threshold, step) = band(lower);

    // Thresholds are multiples of the step below them so this never skips past a threshold.
    (lower + step).min(MAX_PRICE)
}

/// Rounds `price` to the nearest valid price. When `price` is exactly between two valid prices
/// the lower one is chosen.
pub fn calculate_valid_price(price: Coins) -> Coins {
    let lower = floor_valid_price(price);

    if lower == price || lower == MAX_PRICE {
        return lower;
    }

    let higher = calculate_next_higher_price(lower);

    if price - lower <= higher - price {
        lower
    } else {
        higher
    }
}

/// A price which is known to be valid.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[serde(try_from = "Coins", into = "Coins")]
pub struct Price(Coins);

impl Price {
    /// The amount of coins.
    pub fn coins(&self) -> Coins {
        self.0
    }

    /// The next valid price above this one.
    pub fn next_higher(&self) -> Self {
        Self(calculate_next_higher_price(self.0))
    }

    /// The next valid price below this one.
    pub fn next_lower(&self) -> Self {
        Self(calculate_next_lower_price(self.0))
    }

    /// The nearest valid price to `price`.
    pub fn nearest(price: Coins) -> Self {
        Self(calculate_valid_price(price))
    }
}

impl TryFrom<Coins> for Price {
    type Error = ParameterError;

    fn try_from(price: Coins) -> Result<Self, Self::Error> {
        if is_price_valid(price) {
            Ok(Self(price))
        } else {
            Err(ParameterError::InvalidPrice(price))
        }
    }
}

impl From<Price> for Coins {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
