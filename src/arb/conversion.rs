use bigdecimal::BigDecimal;

use super::coin::{Rate, Relationship};

/// Which top-of-book price a conversion amount is based on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSide {
    /// The ask price
    Ask,
    /// The bid price
    Bid,
    /// The last traded price
    Last,
}

/// The result of converting a quantity of one coin into another, net of fee.
///
/// An amount is `None` when the underlying rate is absent. A `Conversion` only
/// exists for convertible coins; inconvertibility is `Market::convert` returning `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Amount at the ask-based rate
    pub ask: Option<BigDecimal>,
    /// Amount at the bid-based rate
    pub bid: Option<BigDecimal>,
    /// Amount at the last-trade-based rate
    pub last: Option<BigDecimal>,
}

impl Conversion {
    /// Converts `quantity` through `relationship`, charging `fee_rate` once on the input.
    #[must_use]
    pub fn through(relationship: &Relationship, quantity: &BigDecimal, fee_rate: &BigDecimal) -> Self {
        let effective = apply_fee(quantity, fee_rate);
        let at = |rate: &Rate| rate.as_ref().map(|rate| &effective * rate);
        Self {
            ask: at(&relationship.ask),
            bid: at(&relationship.bid),
            last: at(&relationship.last),
        }
    }

    /// The amount for a given price side
    #[must_use]
    pub const fn amount(&self, side: PriceSide) -> Option<&BigDecimal> {
        match side {
            PriceSide::Ask => self.ask.as_ref(),
            PriceSide::Bid => self.bid.as_ref(),
            PriceSide::Last => self.last.as_ref(),
        }
    }
}

/// `quantity - quantity * fee_rate`
#[must_use]
pub fn apply_fee(quantity: &BigDecimal, fee_rate: &BigDecimal) -> BigDecimal {
    quantity - &(quantity * fee_rate)
}
