use std::fmt::{self, Debug};
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use derive_more::Display;
use eyre::{bail, Error};
use serde::{Deserialize, Serialize};

/// Currency code as it appears in the venue's market names, e.g. `BTC`
#[derive(Clone, Display, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinId(String);

impl CoinId {
    /// The currency code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CoinId {
    fn from(code: &str) -> Self {
        Self(code.trim().to_uppercase())
    }
}

impl From<String> for CoinId {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

/// A venue market as two currency codes, written `FIRST-SECOND`.
///
/// The venue names its markets `QUOTE-BASE`, so for a market record `first` is the
/// quote currency and `second` the base currency that is priced in it.
#[derive(Clone, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("{first}-{second}")]
pub struct Pair {
    /// The currency written before the dash
    pub first: CoinId,
    /// The currency written after the dash
    pub second: CoinId,
}

impl Debug for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Pair {
    /// Creates a pair from two currency codes
    #[must_use]
    pub const fn new(first: CoinId, second: CoinId) -> Self {
        Self { first, second }
    }

    /// Parses `FIRST-SECOND`
    ///
    /// # Errors
    ///
    /// Returns an error if there is not exactly one dash or either side is empty
    pub fn parse(market: &str) -> Result<Self, Error> {
        let Some((first, second)) = market.split_once('-') else {
            bail!("Market {market} is not of the form QUOTE-BASE");
        };
        if first.trim().is_empty() || second.trim().is_empty() || second.contains('-') {
            bail!("Market {market} is not of the form QUOTE-BASE");
        }
        Ok(Self::new(CoinId::from(first), CoinId::from(second)))
    }

    /// The same market read the other way around
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.second.clone(), self.first.clone())
    }

    /// The quote currency of a venue market name
    #[must_use]
    pub const fn quote(&self) -> &CoinId {
        &self.first
    }

    /// The base currency of a venue market name
    #[must_use]
    pub const fn base(&self) -> &CoinId {
        &self.second
    }
}

impl FromStr for Pair {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// One top-of-book record of the market snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Venue market name, `QUOTE-BASE`
    pub market_name: String,
    /// Lowest ask
    pub ask: BigDecimal,
    /// Highest bid
    pub bid: BigDecimal,
    /// Last traded price
    pub last: BigDecimal,
    /// Time of the quote, when the venue reports one
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

impl QuoteRecord {
    /// Creates a record without a timestamp
    #[must_use]
    pub fn new(market_name: &str, ask: BigDecimal, bid: BigDecimal, last: BigDecimal) -> Self {
        Self {
            market_name: market_name.to_string(),
            ask,
            bid,
            last,
            timestamp: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        let pair = Pair::parse("BTC-ETH").unwrap();
        assert_eq!(pair.quote(), &CoinId::from("BTC"));
        assert_eq!(pair.base(), &CoinId::from("ETH"));
        assert_eq!(pair.to_string(), "BTC-ETH");
        assert_eq!(pair.reversed().to_string(), "ETH-BTC");
    }

    #[test]
    fn test_parse_pair_normalizes_case() {
        let pair: Pair = " usdt-btc".parse().unwrap();
        assert_eq!(pair, Pair::new(CoinId::from("USDT"), CoinId::from("BTC")));
    }

    #[test]
    fn test_parse_invalid_pair() {
        for market in ["BTCETH", "-ETH", "BTC-", "A-B-C"] {
            assert_eq!(
                Pair::parse(market).err().unwrap().to_string(),
                format!("Market {market} is not of the form QUOTE-BASE")
            );
        }
    }
}
