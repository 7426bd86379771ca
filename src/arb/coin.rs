use std::collections::BTreeMap;

use bigdecimal::{BigDecimal, One, Zero};
use chrono::NaiveDateTime;

use super::types::CoinId;

/// A single rate, or `None` when the venue gave no usable price.
/// A rate held in `Some` is never zero.
pub type Rate = Option<BigDecimal>;

/// Wraps a raw quote value, treating zero as "no rate"
#[must_use]
pub fn rate(value: &BigDecimal) -> Rate {
    if value.is_zero() {
        None
    } else {
        Some(value.clone())
    }
}

/// Reciprocal of a rate. An absent rate stays absent.
#[must_use]
pub fn reciprocal(rate: &Rate) -> Rate {
    rate.as_ref()
        .filter(|value| !value.is_zero())
        .map(|value| BigDecimal::one() / value)
}

/// The rates for converting one unit of a coin into a counterpart coin
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Relationship {
    /// Ask-based rate
    pub ask: Rate,
    /// Bid-based rate
    pub bid: Rate,
    /// Last-trade-based rate
    pub last: Rate,
    /// When the quote was taken, if known
    pub timestamp: Option<NaiveDateTime>,
}

impl Relationship {
    /// Creates a relationship from raw quote values
    #[must_use]
    pub fn new(ask: &BigDecimal, bid: &BigDecimal, last: &BigDecimal) -> Self {
        Self {
            ask: rate(ask),
            bid: rate(bid),
            last: rate(last),
            timestamp: None,
        }
    }

    /// The relationship for the opposite direction: every rate inverted
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            ask: reciprocal(&self.ask),
            bid: reciprocal(&self.bid),
            last: reciprocal(&self.last),
            timestamp: self.timestamp,
        }
    }
}

/// A currency and its known relationships to counterpart currencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    /// Currency code
    pub id: CoinId,
    /// Counterpart currency -> rates from this coin into it
    pub relationships: BTreeMap<CoinId, Relationship>,
}

impl Coin {
    /// A coin with no relationships yet
    #[must_use]
    pub const fn new(id: CoinId) -> Self {
        Self {
            id,
            relationships: BTreeMap::new(),
        }
    }

    /// The relationship from this coin into `other`, if any
    #[must_use]
    pub fn relationship(&self, other: &CoinId) -> Option<&Relationship> {
        self.relationships.get(other)
    }

    /// Whether this coin has a direct relationship into `other`
    #[must_use]
    pub fn relates_to(&self, other: &CoinId) -> bool {
        self.relationships.contains_key(other)
    }
}
