use std::fmt::{self, Display};

use bigdecimal::BigDecimal;
use derive_more::Display as DeriveDisplay;

use super::coin::reciprocal;
use super::market::Market;
use super::path::ArbitragePath;
use super::types::{CoinId, Pair};

/// Whether a leg buys or sells on its venue market
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeriveDisplay)]
pub enum Side {
    /// Buy the market's base currency with its quote currency
    #[display("buy")]
    Buy,
    /// Sell the market's base currency for its quote currency
    #[display("sell")]
    Sell,
}

/// One order a leg of a route would place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegPlan {
    /// Currency spent
    pub input: CoinId,
    /// Currency received
    pub output: CoinId,
    /// Venue market the order goes to
    pub market: Pair,
    /// Buy or sell
    pub side: Side,
    /// Amount of `input` spent
    pub quantity: BigDecimal,
    /// Limit rate, in `input` per unit of `output`
    pub rate: BigDecimal,
    /// Expected amount of `output`: `quantity / rate`
    pub expected: BigDecimal,
}

impl LegPlan {
    /// Plans the conversion of `quantity` of `input` into `output`.
    ///
    /// If the venue lists the market `input-output`, the leg buys at that market's bid.
    /// If it lists `output-input`, the leg sells there at the reciprocal of the ask.
    ///
    /// # Returns
    ///
    /// `None` when the venue lists neither market or the needed rate is absent
    #[must_use]
    pub fn new(market: &Market<'_>, input: &CoinId, output: &CoinId, quantity: &BigDecimal) -> Option<Self> {
        let buy = Pair::new(input.clone(), output.clone());
        let sell = buy.reversed();
        let (pair, side, rate) = if market.is_listed(&buy) {
            let listed = market.relationship(output, input)?;
            (buy, Side::Buy, listed.bid.clone()?)
        } else if market.is_listed(&sell) {
            let listed = market.relationship(input, output)?;
            (sell, Side::Sell, reciprocal(&listed.ask)?)
        } else {
            return None;
        };
        let expected = quantity / &rate;
        Some(Self {
            input: input.clone(),
            output: output.clone(),
            market: pair,
            side,
            quantity: quantity.clone(),
            rate,
            expected,
        })
    }
}

impl Display for LegPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} {} -> {} {} @ {}",
            self.market,
            self.side,
            self.quantity.round(8),
            self.input,
            self.expected.round(8),
            self.output,
            self.rate.round(8)
        )
    }
}

/// The three orders that would execute a selected path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePlan {
    /// The path the plan executes
    pub path: ArbitragePath,
    /// Origin to vessel, vessel to destination, destination to origin
    pub legs: [LegPlan; 3],
}

impl RoutePlan {
    /// Plans a path, feeding each leg the expected output of the previous one
    ///
    /// # Returns
    ///
    /// `None` if any leg cannot be planned
    #[must_use]
    pub fn new(market: &Market<'_>, path: &ArbitragePath) -> Option<Self> {
        let first = LegPlan::new(market, &path.origin, &path.vessel, &path.stake)?;
        let second = LegPlan::new(market, &path.vessel, &path.destination, &first.expected)?;
        let third = LegPlan::new(market, &path.destination, &path.origin, &second.expected)?;
        Some(Self {
            path: path.clone(),
            legs: [first, second, third],
        })
    }
}

impl Display for RoutePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} stake {} gain {}",
            self.path,
            self.path.stake,
            self.path.gain.round(8)
        )?;
        for (i, leg) in self.legs.iter().enumerate() {
            writeln!(f, "  leg {}: {leg}", i + 1)?;
        }
        Ok(())
    }
}
