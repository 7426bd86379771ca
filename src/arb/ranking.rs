//! Ranking and selection of quoted paths.
//!
//! Gains are denominated in each route's origin currency, so routes are compared by their
//! best gain expressed in the settlement currency.

use std::cmp::Ordering;

use bigdecimal::BigDecimal;

use super::conversion::PriceSide;
use super::market::Market;
use super::path::{ArbitragePath, PathBook, Route};

/// Stable-sorts paths by gain, highest first. Equal gains keep their relative order.
pub fn rank(paths: &mut [ArbitragePath]) {
    paths.sort_by(|a, b| b.gain.cmp(&a.gain));
}

/// A path's gain converted into the settlement currency at the last-trade rate.
///
/// # Returns
///
/// The gain itself when the origin is the settlement currency, or `None` when the origin
/// does not convert into the settlement currency
#[must_use]
pub fn normalized_gain(market: &Market<'_>, path: &ArbitragePath) -> Option<BigDecimal> {
    let settlement = &market.profile().settlement;
    if &path.origin == settlement {
        return Some(path.gain.clone());
    }
    market
        .convert(&path.origin, settlement, &path.gain)
        .and_then(|conversion| conversion.amount(PriceSide::Last).cloned())
}

/// The paths of one route, best first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRoute {
    /// Origin and destination
    route: Route,
    /// Paths sorted by gain, highest first; never empty
    paths: Vec<ArbitragePath>,
    /// Best gain in the settlement currency, if it converts
    normalized_gain: Option<BigDecimal>,
}

impl RankedRoute {
    /// Origin and destination
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Paths sorted by gain, highest first
    #[must_use]
    pub fn paths(&self) -> &[ArbitragePath] {
        &self.paths
    }

    /// Best gain in the settlement currency, if it converts
    #[must_use]
    pub const fn normalized_gain(&self) -> Option<&BigDecimal> {
        self.normalized_gain.as_ref()
    }

    /// The best path of the route
    #[must_use]
    pub fn best(&self) -> &ArbitragePath {
        // only built by `RankedPaths::new`, which drops empty routes
        &self.paths[0]
    }
}

/// Every route of a cycle, ordered by normalized best gain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedPaths {
    /// Routes, best first
    routes: Vec<RankedRoute>,
}

impl RankedPaths {
    /// Ranks a path book.
    ///
    /// Routes without any path are dropped. Routes whose best gain does not convert into
    /// the settlement currency come after all others.
    #[must_use]
    pub fn new(market: &Market<'_>, book: PathBook) -> Self {
        let mut routes: Vec<RankedRoute> = book
            .into_iter()
            .filter(|(_, paths)| !paths.is_empty())
            .map(|(route, mut paths)| {
                rank(&mut paths);
                let normalized_gain = normalized_gain(market, &paths[0]);
                RankedRoute {
                    route,
                    paths,
                    normalized_gain,
                }
            })
            .collect();

        routes.sort_by(|a, b| match (&a.normalized_gain, &b.normalized_gain) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Self { routes }
    }

    /// Routes, best first
    #[must_use]
    pub fn routes(&self) -> &[RankedRoute] {
        &self.routes
    }

    /// Number of ranked routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no route has a path
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The best path of the route ranked `offset` from the top. `0` is the single best trade.
    #[must_use]
    pub fn best_trade(&self, offset: usize) -> Option<&ArbitragePath> {
        self.routes.get(offset).map(RankedRoute::best)
    }

    /// Every path with a strictly positive gain, in ranked order
    pub fn opportunities(&self) -> impl Iterator<Item = &ArbitragePath> {
        self.routes
            .iter()
            .flat_map(|route| route.paths().iter())
            .filter(|path| path.is_profitable())
    }
}
