//! Process configuration.
//!
//! Everything here is read once at startup from the environment (a `.env` file is
//! honoured) and never changes afterwards. Invalid configuration is fatal.

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use bigdecimal::{BigDecimal, One, Zero};
use eyre::{bail, eyre, Result};
use url::Url;

use crate::arb::types::{CoinId, Pair};
use crate::utils::constants::{
    BITTREX_API_URL, BITTREX_FEE_RATE, BITTREX_MARKETS, BITTREX_ORIGINS, BITTREX_SETTLEMENT,
    DEFAULT_CYCLE_TIMEOUT_SECS, DEFAULT_POLL_SECS,
};

/// The venue-specific rules the detection engine runs under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeProfile {
    /// Profile name, e.g. `bittrex`
    pub name: String,
    /// Fraction of every leg's input taken as fee
    pub fee_rate: BigDecimal,
    /// Currencies that may be staked, with the maximum stake for each
    pub origins: BTreeMap<CoinId, BigDecimal>,
    /// Markets the venue lists natively; a leg along one of these is a buy at the ask
    pub markets: BTreeSet<Pair>,
    /// Currency gains are normalized into for ranking
    pub settlement: CoinId,
    /// Whether the settlement currency may itself start a route
    pub settlement_initiates: bool,
}

impl ExchangeProfile {
    /// The built-in profile for a venue
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported venue
    pub fn builtin(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "bittrex" => Ok(Self {
                name: "bittrex".to_string(),
                fee_rate: BigDecimal::from_str(BITTREX_FEE_RATE)?,
                origins: parse_amounts(BITTREX_ORIGINS)?,
                markets: parse_markets(BITTREX_MARKETS)?,
                settlement: CoinId::from(BITTREX_SETTLEMENT),
                settlement_initiates: false,
            }),
            other => bail!("{other} is not a supported exchange"),
        }
    }

    /// The configured maximum stake for an origin
    #[must_use]
    pub fn max_stake(&self, origin: &CoinId) -> Option<&BigDecimal> {
        self.origins.get(origin)
    }

    /// Whether `coin` may be staked
    #[must_use]
    pub fn is_origin(&self, coin: &CoinId) -> bool {
        self.origins.contains_key(coin)
    }

    /// Whether a route may start from `origin`
    #[must_use]
    pub fn initiates(&self, origin: &CoinId) -> bool {
        self.settlement_initiates || origin != &self.settlement
    }

    /// Whether `input-output` is a market the venue lists natively
    #[must_use]
    pub fn is_native_market(&self, input: &CoinId, output: &CoinId) -> bool {
        self.markets
            .contains(&Pair::new(input.clone(), output.clone()))
    }

    /// Checks the profile is usable
    ///
    /// # Errors
    ///
    /// Returns an error describing the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.fee_rate < BigDecimal::zero() || self.fee_rate >= BigDecimal::one() {
            bail!("Fee rate {} must be in [0, 1)", self.fee_rate);
        }
        if self.origins.is_empty() {
            bail!("At least one origin currency must be configured");
        }
        for (origin, stake) in &self.origins {
            if stake <= &BigDecimal::zero() {
                bail!("Origin {origin} has no positive stake limit");
            }
        }
        if !self.is_origin(&self.settlement) {
            bail!(
                "Settlement currency {} has no stake limit",
                self.settlement
            );
        }
        Ok(())
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Venue rules
    pub profile: ExchangeProfile,
    /// Base URL of the venue's public API
    pub api_url: Url,
    /// Time between the end of one cycle's wait and the next fetch
    pub poll_interval: Duration,
    /// Upper bound for one detection cycle
    pub cycle_timeout: Duration,
    /// Balances for the static balance source
    pub balances: BTreeMap<CoinId, BigDecimal>,
    /// Slack token, when route notifications are wanted
    pub slack_token: Option<String>,
}

impl Config {
    /// Loads configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is malformed or the result does not validate
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from any key lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a value is malformed or the result does not validate
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let exchange = lookup("VESSEL_EXCHANGE").unwrap_or_else(|| "bittrex".to_string());
        let mut profile = ExchangeProfile::builtin(&exchange)?;

        if let Some(fee) = lookup("VESSEL_FEE_RATE") {
            profile.fee_rate = BigDecimal::from_str(fee.trim())
                .map_err(|e| eyre!("VESSEL_FEE_RATE {fee}: {e}"))?;
        }
        if let Some(origins) = lookup("VESSEL_ORIGINS") {
            profile.origins = parse_amounts(&origins)?;
        }
        if let Some(markets) = lookup("VESSEL_MARKETS") {
            profile.markets = parse_markets(&markets)?;
        }
        if let Some(settlement) = lookup("VESSEL_SETTLEMENT") {
            profile.settlement = CoinId::from(settlement);
        }
        if let Some(initiates) = lookup("VESSEL_SETTLEMENT_INITIATES") {
            profile.settlement_initiates = initiates
                .trim()
                .parse()
                .map_err(|e| eyre!("VESSEL_SETTLEMENT_INITIATES {initiates}: {e}"))?;
        }
        profile.validate()?;

        let api_url = lookup("VESSEL_API_URL").unwrap_or_else(|| BITTREX_API_URL.to_string());
        let api_url = Url::parse(&api_url).map_err(|e| eyre!("VESSEL_API_URL {api_url}: {e}"))?;

        let balances = lookup("VESSEL_BALANCES")
            .map(|balances| parse_amounts(&balances))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            profile,
            api_url,
            poll_interval: Duration::from_secs(seconds(&lookup, "VESSEL_POLL_SECS", DEFAULT_POLL_SECS)?),
            cycle_timeout: Duration::from_secs(seconds(
                &lookup,
                "VESSEL_CYCLE_TIMEOUT_SECS",
                DEFAULT_CYCLE_TIMEOUT_SECS,
            )?),
            balances,
            slack_token: lookup("SLACK_OAUTH_TOKEN").filter(|token| !token.is_empty()),
        })
    }
}

/// Reads a positive number of seconds
fn seconds<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    let secs: u64 = value.trim().parse().map_err(|e| eyre!("{key} {value}: {e}"))?;
    if secs == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(secs)
}

/// Parses `BTC:0.0072,ETH:0.072`
///
/// # Errors
///
/// Returns an error for an entry without a colon or with a malformed amount
pub fn parse_amounts(list: &str) -> Result<BTreeMap<CoinId, BigDecimal>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (coin, amount) = entry
                .split_once(':')
                .ok_or_else(|| eyre!("Expected CURRENCY:AMOUNT, got {entry}"))?;
            let amount = BigDecimal::from_str(amount.trim())
                .map_err(|e| eyre!("Bad amount in {entry}: {e}"))?;
            Ok((CoinId::from(coin), amount))
        })
        .collect()
}

/// Parses `BTC-ETH,USDT-BTC`
///
/// # Errors
///
/// Returns an error for a malformed market
pub fn parse_markets(list: &str) -> Result<BTreeSet<Pair>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(Pair::parse)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::arb::test_helpers::dec;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        let profile = &config.profile;
        assert_eq!(profile.name, "bittrex");
        assert_eq!(profile.fee_rate, dec("0.0025"));
        assert_eq!(profile.max_stake(&CoinId::from("BTC")), Some(&dec("0.0072")));
        assert_eq!(profile.max_stake(&CoinId::from("ETH")), Some(&dec("0.072")));
        assert_eq!(profile.max_stake(&CoinId::from("USDT")), Some(&dec("100")));
        assert!(profile.is_native_market(&CoinId::from("BTC"), &CoinId::from("ETH")));
        assert!(!profile.is_native_market(&CoinId::from("ETH"), &CoinId::from("BTC")));
        assert!(!profile.initiates(&CoinId::from("USDT")));
        assert!(profile.initiates(&CoinId::from("BTC")));
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert!(config.balances.is_empty());
        assert!(config.slack_token.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("VESSEL_FEE_RATE", "0.001"),
            ("VESSEL_ORIGINS", "btc:1, usd:500"),
            ("VESSEL_MARKETS", "USD-BTC"),
            ("VESSEL_SETTLEMENT", "USD"),
            ("VESSEL_SETTLEMENT_INITIATES", "true"),
            ("VESSEL_BALANCES", "BTC:0.5"),
            ("VESSEL_POLL_SECS", "3"),
        ])
        .unwrap();
        assert_eq!(config.profile.fee_rate, dec("0.001"));
        assert_eq!(config.profile.origins.len(), 2);
        assert!(config.profile.initiates(&CoinId::from("USD")));
        assert_eq!(config.balances.get(&CoinId::from("BTC")), Some(&dec("0.5")));
        assert_eq!(config.poll_interval, Duration::from_secs(3));
    }

    #[test]
    fn test_unsupported_exchange() {
        let err = config(&[("VESSEL_EXCHANGE", "kraken")]).err().unwrap();
        assert_eq!(err.to_string(), "kraken is not a supported exchange");
    }

    #[test]
    fn test_settlement_without_stake_limit() {
        let err = config(&[("VESSEL_ORIGINS", "BTC:1,ETH:2")]).err().unwrap();
        assert_eq!(err.to_string(), "Settlement currency USDT has no stake limit");
    }

    #[test]
    fn test_invalid_values() {
        assert!(config(&[("VESSEL_FEE_RATE", "1")]).is_err());
        assert!(config(&[("VESSEL_ORIGINS", "BTC")]).is_err());
        assert!(config(&[("VESSEL_ORIGINS", "BTC:0,USDT:1")]).is_err());
        assert!(config(&[("VESSEL_MARKETS", "BTCETH")]).is_err());
        assert!(config(&[("VESSEL_API_URL", "not a url")]).is_err());
        assert!(config(&[("VESSEL_POLL_SECS", "0")]).is_err());
    }
}
