use std::collections::BTreeMap;
use std::path::Path;

use bigdecimal::BigDecimal;
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

use super::balances::BalanceSource;
use super::market_summaries::MarketSource;
use crate::arb::types::{CoinId, QuoteRecord};

/// A recorded market snapshot with balances, for offline scans.
///
/// ```json
/// {
///   "markets": [{"market_name": "BTC-LTC", "ask": "0.004", "bid": "0.0039", "last": "0.00395"}],
///   "balances": {"BTC": "0.01"}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Quote records
    pub markets: Vec<QuoteRecord>,
    /// Available balances
    #[serde(default)]
    pub balances: BTreeMap<CoinId, BigDecimal>,
}

impl Snapshot {
    /// Parses a snapshot from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid snapshot
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).wrap_err("Invalid snapshot")
    }

    /// Reads a snapshot file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Cannot read snapshot {}", path.display()))?;
        Self::from_json(&text)
    }
}

impl MarketSource for Snapshot {
    async fn market_summaries(&self) -> Result<Vec<QuoteRecord>> {
        Ok(self.markets.clone())
    }
}

impl BalanceSource for Snapshot {
    async fn balances(&self) -> Result<BTreeMap<CoinId, BigDecimal>> {
        Ok(self.balances.clone())
    }
}
