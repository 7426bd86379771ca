/// An arbitrage path stakes an origin coin, converts it through a vessel coin into a
/// destination coin and back into the origin. It is primarily used to compare the gain of
/// every vessel for a given origin and destination.
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display};

use bigdecimal::{BigDecimal, Zero};
use derive_more::Display as DeriveDisplay;
use log::debug;

use super::conversion::PriceSide;
use super::market::Market;
use super::types::CoinId;

/// An origin and the destination a route reaches before returning
#[derive(Clone, DeriveDisplay, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("{origin}-{destination}")]
pub struct Route {
    /// The staked currency
    pub origin: CoinId,
    /// The second origin currency, reached through the vessel
    pub destination: CoinId,
}

impl Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Route {
    /// Creates a route
    #[must_use]
    pub const fn new(origin: CoinId, destination: CoinId) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

/// Summary of one three-leg route, created fresh each cycle and never mutated
#[derive(Clone, PartialEq, Eq)]
pub struct ArbitragePath {
    /// Staked currency
    pub origin: CoinId,
    /// Currency reached on the second leg
    pub destination: CoinId,
    /// Intermediate currency of the first leg
    pub vessel: CoinId,
    /// Amount staked
    pub stake: BigDecimal,
    /// Origin converted straight into the destination at the ask, for comparison only
    pub direct: Option<BigDecimal>,
    /// Origin amount after all three legs
    pub final_amount: BigDecimal,
    /// `final_amount - stake`
    pub gain: BigDecimal,
}

impl Debug for ArbitragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArbitragePath({} -> {} -> {} -> {}, {} -> {}, gain {})",
            self.origin,
            self.vessel,
            self.destination,
            self.origin,
            self.stake,
            self.final_amount,
            self.gain
        )
    }
}

impl Display for ArbitragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} -> {} -> {}",
            self.origin, self.vessel, self.destination, self.origin
        )
    }
}

impl ArbitragePath {
    /// Quotes the route `origin -> vessel -> destination -> origin` for `stake`.
    ///
    /// Every leg is valued at the side `Market::leg_side` picks for it.
    ///
    /// # Returns
    ///
    /// `None` if any leg is not convertible, or if the final amount is not strictly positive
    #[must_use]
    pub fn quote(
        market: &Market<'_>,
        origin: &CoinId,
        vessel: &CoinId,
        destination: &CoinId,
        stake: &BigDecimal,
        direct: Option<&BigDecimal>,
    ) -> Option<Self> {
        let vessel_amount = market.convert_leg(origin, vessel, stake)?;
        let destination_amount = market.convert_leg(vessel, destination, &vessel_amount)?;
        let final_amount = market.convert_leg(destination, origin, &destination_amount)?;

        if final_amount <= BigDecimal::zero() {
            return None;
        }

        let gain = &final_amount - stake;
        Some(Self {
            origin: origin.clone(),
            destination: destination.clone(),
            vessel: vessel.clone(),
            stake: stake.clone(),
            direct: direct.cloned(),
            final_amount,
            gain,
        })
    }

    /// The route this path belongs to
    #[must_use]
    pub fn route(&self) -> Route {
        Route::new(self.origin.clone(), self.destination.clone())
    }

    /// Whether the path returns more than it stakes
    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.gain > BigDecimal::zero()
    }
}

/// Every quoted path, grouped by route
pub type PathBook = BTreeMap<Route, Vec<ArbitragePath>>;

/// Enumerates every three-leg path for every staked origin and every other origin as
/// destination, trying each coin of the market as vessel.
///
/// The settlement currency only starts routes when the profile allows it. Every eligible
/// route gets an entry, possibly empty.
#[must_use]
pub fn enumerate_paths(market: &Market<'_>, stakes: &BTreeMap<CoinId, BigDecimal>) -> PathBook {
    let profile = market.profile();
    let mut book = PathBook::new();

    for (origin, stake) in stakes {
        if !profile.initiates(origin) {
            continue;
        }
        for destination in profile.origins.keys() {
            if destination == origin {
                continue;
            }

            let direct = market
                .convert(origin, destination, stake)
                .and_then(|conversion| conversion.amount(PriceSide::Ask).cloned());

            let paths: Vec<ArbitragePath> = market
                .coin_ids()
                .filter_map(|vessel| {
                    ArbitragePath::quote(market, origin, vessel, destination, stake, direct.as_ref())
                })
                .collect();

            debug!(
                "{} paths for {origin} -> {destination} at {stake}",
                paths.len()
            );
            book.insert(Route::new(origin.clone(), destination.clone()), paths);
        }
    }
    book
}
