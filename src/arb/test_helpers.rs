use std::str::FromStr;

use bigdecimal::BigDecimal;

use super::market::Market;
use super::portfolio::Portfolio;
use super::types::{CoinId, QuoteRecord};
use crate::config::{parse_markets, ExchangeProfile};

#[allow(dead_code, clippy::unwrap_used)]
pub fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

#[allow(dead_code)]
pub fn coin(id: &str) -> CoinId {
    CoinId::from(id)
}

#[allow(dead_code)]
pub fn record(market_name: &str, ask: &str, bid: &str, last: &str) -> QuoteRecord {
    QuoteRecord::new(market_name, dec(ask), dec(bid), dec(last))
}

#[allow(dead_code, clippy::unwrap_used)]
pub fn profile(fee_rate: &str, origins: &[(&str, &str)], markets: &[&str], settlement: &str) -> ExchangeProfile {
    ExchangeProfile {
        name: "test".to_string(),
        fee_rate: dec(fee_rate),
        origins: origins
            .iter()
            .map(|(origin, stake)| (coin(origin), dec(stake)))
            .collect(),
        markets: parse_markets(&markets.join(",")).unwrap(),
        settlement: coin(settlement),
        settlement_initiates: false,
    }
}

#[allow(dead_code)]
pub fn market<'a>(profile: &'a ExchangeProfile, records: &[QuoteRecord]) -> Market<'a> {
    Market::from_snapshot(profile, records)
}

#[allow(dead_code)]
pub fn portfolio(balances: &[(&str, &str)]) -> Portfolio {
    Portfolio::new(
        balances
            .iter()
            .map(|(currency, amount)| (coin(currency), dec(amount))),
    )
}

/// Three origins and a handful of vessels, with one profitable loop:
/// BTC -> LTC -> ETH -> BTC pays out more than it costs.
#[allow(dead_code)]
pub fn sample_records() -> Vec<QuoteRecord> {
    vec![
        record("BTC-ETH", "0.05", "0.048", "0.049"),
        record("USDT-BTC", "20000", "19800", "19900"),
        record("USDT-ETH", "1000", "980", "990"),
        record("BTC-LTC", "0.004", "0.0039", "0.00395"),
        record("ETH-LTC", "0.1", "0.095", "0.097"),
        record("USDT-LTC", "81", "79", "80"),
        record("BTC-XRP", "0.00002", "0.0000195", "0.0000198"),
        record("ETH-XRP", "0.0004", "0.00039", "0.000395"),
    ]
}

/// The profile `sample_records` is meant for
#[allow(dead_code)]
pub fn sample_profile() -> ExchangeProfile {
    profile(
        "0.0025",
        &[("BTC", "0.0072"), ("ETH", "0.072"), ("USDT", "100")],
        &["BTC-ETH", "USDT-BTC", "USDT-ETH"],
        "USDT",
    )
}
