use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use eyre::Result;
use itertools::Itertools;
use log::debug;
use tokio::sync::RwLock;

use crate::arb::portfolio::Portfolio;
use crate::arb::types::CoinId;

/// Supplies available balances once per cycle
#[allow(async_fn_in_trait)]
pub trait BalanceSource {
    /// Available amount per currency
    ///
    /// # Errors
    ///
    /// Returns an error if balances cannot be fetched; the cycle is then abandoned
    async fn balances(&self) -> Result<BTreeMap<CoinId, BigDecimal>>;
}

/// Balances fixed at startup, from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticBalanceSource {
    /// The balances reported every cycle
    balances: BTreeMap<CoinId, BigDecimal>,
}

impl StaticBalanceSource {
    /// Creates a source that always reports `balances`
    #[must_use]
    pub const fn new(balances: BTreeMap<CoinId, BigDecimal>) -> Self {
        Self { balances }
    }
}

impl BalanceSource for StaticBalanceSource {
    async fn balances(&self) -> Result<BTreeMap<CoinId, BigDecimal>> {
        Ok(self.balances.clone())
    }
}

/// Process-wide balance cache.
///
/// The refresher takes the write lock; readers take the read lock and leave with their
/// own copy, so a detection cycle never observes a refresh halfway through.
#[derive(Debug, Default)]
pub struct BalanceCache {
    /// Latest known balances
    portfolio: RwLock<Portfolio>,
}

impl BalanceCache {
    /// An empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached balances with a fresh read from `source`, keeping only positive
    /// amounts. On error the cache is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the source's error
    pub async fn refresh<S: BalanceSource>(&self, source: &S) -> Result<Portfolio> {
        let balances = source.balances().await?;
        let portfolio = Portfolio::new(balances);
        debug!(
            "Balances refreshed: {}",
            portfolio
                .iter()
                .map(|(coin, amount)| format!("{coin} {amount}"))
                .join(", ")
        );
        *self.portfolio.write().await = portfolio.clone();
        Ok(portfolio)
    }

    /// A copy of the cached balances
    pub async fn snapshot(&self) -> Portfolio {
        self.portfolio.read().await.clone()
    }

    /// The cached balance of one currency
    pub async fn get(&self, coin: &CoinId) -> Option<BigDecimal> {
        self.portfolio.read().await.balance(coin).cloned()
    }
}
