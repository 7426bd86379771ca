use log::info;

use super::market::Market;
use super::path::{enumerate_paths, ArbitragePath};
use super::portfolio::Portfolio;
use super::ranking::RankedPaths;
use super::route::RoutePlan;
use super::types::QuoteRecord;
use crate::config::ExchangeProfile;

/// The outcome of one detection cycle over one snapshot.
///
/// Everything in here is built from the snapshot and the balances passed in; nothing is
/// shared with other cycles.
#[derive(Debug, Clone)]
pub struct Detection<'a> {
    /// The relationship graph of the snapshot
    pub market: Market<'a>,
    /// Every quoted path, ranked
    pub ranked: RankedPaths,
}

impl<'a> Detection<'a> {
    /// Runs the pipeline: build and complete the graph, resolve stakes, enumerate paths, rank.
    #[must_use]
    pub fn run(profile: &'a ExchangeProfile, records: &[QuoteRecord], portfolio: &Portfolio) -> Self {
        let market = Market::from_snapshot(profile, records);
        let stakes = portfolio.stakes(profile);
        let book = enumerate_paths(&market, &stakes);
        let ranked = RankedPaths::new(&market, book);

        info!(
            "Detection over {} coins: {} staked origins, {} routes ranked, {} opportunities",
            market.len(),
            stakes.len(),
            ranked.len(),
            ranked.opportunities().count()
        );
        Self { market, ranked }
    }

    /// The best path if it gains anything
    #[must_use]
    pub fn best_opportunity(&self) -> Option<&ArbitragePath> {
        self.ranked
            .best_trade(0)
            .filter(|path| path.is_profitable())
    }

    /// The order plan for the best opportunity
    #[must_use]
    pub fn best_plan(&self) -> Option<RoutePlan> {
        self.best_opportunity()
            .and_then(|path| RoutePlan::new(&self.market, path))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_recomputation_is_idempotent() {
        let profile = sample_profile();
        let portfolio = portfolio(&[("BTC", "1"), ("ETH", "1"), ("USDT", "1000")]);
        let records = sample_records();

        let first = Detection::run(&profile, &records, &portfolio);
        let second = Detection::run(&profile, &records, &portfolio);
        assert_eq!(first.ranked, second.ranked);
        assert!(!first.ranked.is_empty());
    }

    #[test]
    fn test_best_plan() {
        let profile = sample_profile();
        let portfolio = portfolio(&[("BTC", "1"), ("ETH", "1")]);
        let detection = Detection::run(&profile, &sample_records(), &portfolio);

        let plan = detection.best_plan().unwrap();
        assert_eq!(plan.path.vessel, coin("LTC"));
        assert_eq!(plan.path.destination, coin("ETH"));
    }

    #[test]
    fn test_no_opportunity_without_profit() {
        let profile = sample_profile();
        let portfolio = portfolio(&[("ETH", "1")]);
        let detection = Detection::run(&profile, &sample_records(), &portfolio);

        assert!(detection.ranked.best_trade(0).is_some());
        assert!(detection.best_opportunity().is_none());
        assert!(detection.best_plan().is_none());
    }

    #[test]
    fn test_no_balances_no_routes() {
        let profile = sample_profile();
        let detection = Detection::run(&profile, &sample_records(), &Portfolio::default());
        assert!(detection.ranked.is_empty());
    }
}
