use std::collections::BTreeMap;

use bigdecimal::{BigDecimal, Zero};

use super::types::CoinId;
use crate::config::ExchangeProfile;

/// Represents a portfolio of currency holdings.
///
/// A portfolio tracks the available balance of each currency identified by its `CoinId`.
/// Only strictly positive balances are held; a currency without an entry is not available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Portfolio {
    /// Map of currencies to their available balances
    holdings: BTreeMap<CoinId, BigDecimal>,
}

impl Portfolio {
    /// Creates a new portfolio from the given holdings, dropping any that are not positive.
    ///
    /// # Arguments
    ///
    /// * `holdings` - Currencies and their available balances
    ///
    /// # Returns
    ///
    /// A new Portfolio instance
    #[must_use]
    pub fn new<I>(holdings: I) -> Self
    where
        I: IntoIterator<Item = (CoinId, BigDecimal)>,
    {
        Self {
            holdings: holdings
                .into_iter()
                .filter(|(_, amount)| amount > &BigDecimal::zero())
                .collect(),
        }
    }

    /// Returns the balance of a specific currency in the portfolio.
    ///
    /// # Arguments
    ///
    /// * `coin` - The currency to query
    ///
    /// # Returns
    ///
    /// The available balance if the currency is held, or None otherwise
    #[must_use]
    pub fn balance(&self, coin: &CoinId) -> Option<&BigDecimal> {
        self.holdings.get(coin)
    }

    /// All holdings, in currency order
    pub fn iter(&self) -> impl Iterator<Item = (&CoinId, &BigDecimal)> {
        self.holdings.iter()
    }

    /// The stake for an origin: its configured maximum, capped by the available balance.
    ///
    /// # Returns
    ///
    /// `None` if the origin has no stake limit or no balance, which excludes it from the
    /// cycle
    #[must_use]
    pub fn resolve_stake(&self, profile: &ExchangeProfile, origin: &CoinId) -> Option<BigDecimal> {
        let max_stake = profile.max_stake(origin)?;
        let available = self.balance(origin)?;
        Some(max_stake.min(available).clone())
    }

    /// Resolved stakes for every origin that has one
    #[must_use]
    pub fn stakes(&self, profile: &ExchangeProfile) -> BTreeMap<CoinId, BigDecimal> {
        profile
            .origins
            .keys()
            .filter_map(|origin| {
                self.resolve_stake(profile, origin)
                    .map(|stake| (origin.clone(), stake))
            })
            .collect()
    }
}
