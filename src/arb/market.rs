//! The relationship graph of one market snapshot.
//!
//! A `Market` is built fresh for every detection cycle: quote records are ingested into
//! coin relationships, missing edges towards origin currencies are derived by inversion,
//! and conversions are answered from the resulting graph. It borrows the exchange profile
//! and owns everything else, so nothing leaks from one cycle into the next.

use std::collections::{BTreeMap, BTreeSet};

use bigdecimal::{BigDecimal, Zero};
use log::{debug, warn};

use super::coin::{Coin, Relationship};
use super::conversion::{Conversion, PriceSide};
use super::types::{CoinId, Pair, QuoteRecord};
use crate::config::ExchangeProfile;

/// Coin relationship graph for one snapshot
#[derive(Debug, Clone)]
pub struct Market<'a> {
    /// Venue rules the graph is interpreted under
    profile: &'a ExchangeProfile,
    /// Every coin seen in the snapshot, plus every origin
    coins: BTreeMap<CoinId, Coin>,
    /// Markets the snapshot quoted, as the venue names them
    listed: BTreeSet<Pair>,
}

impl<'a> Market<'a> {
    /// Creates an empty market
    #[must_use]
    pub const fn new(profile: &'a ExchangeProfile) -> Self {
        Self {
            profile,
            coins: BTreeMap::new(),
            listed: BTreeSet::new(),
        }
    }

    /// Builds the full graph for a snapshot: ingest, then complete
    #[must_use]
    pub fn from_snapshot(profile: &'a ExchangeProfile, records: &[QuoteRecord]) -> Self {
        let mut market = Self::new(profile);
        let ingested = market.ingest(records);
        let derived = market.complete();
        debug!(
            "Market built from {} records: {ingested} relationships ingested, {derived} derived, {} coins",
            records.len(),
            market.coins.len()
        );
        market
    }

    /// The exchange profile this market is read under
    #[must_use]
    pub const fn profile(&self) -> &'a ExchangeProfile {
        self.profile
    }

    /// Ingests quote records as `base -> quote` relationships. A later record for the same
    /// market replaces the earlier one.
    ///
    /// Records with a zero ask, bid or last, or with a malformed market name, are skipped.
    /// Afterwards every origin currency has a coin entry, even if it has no relationships.
    ///
    /// # Returns
    ///
    /// The number of relationships written
    pub fn ingest(&mut self, records: &[QuoteRecord]) -> usize {
        let mut ingested = 0;
        for record in records {
            let pair = match Pair::parse(&record.market_name) {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("Skipping quote: {e}");
                    continue;
                }
            };
            if record.ask.is_zero() || record.bid.is_zero() || record.last.is_zero() {
                debug!("Skipping {pair}: zero quote");
                continue;
            }

            let relationship = Relationship {
                timestamp: record.timestamp,
                ..Relationship::new(&record.ask, &record.bid, &record.last)
            };
            self.coin_entry(pair.base())
                .relationships
                .insert(pair.quote().clone(), relationship);
            self.listed.insert(pair);
            ingested += 1;
        }

        let profile = self.profile;
        for origin in profile.origins.keys() {
            self.coin_entry(origin);
        }
        ingested
    }

    /// Derives `coin -> origin` for every coin lacking it when `origin -> coin` is known.
    ///
    /// # Returns
    ///
    /// The number of relationships derived
    pub fn complete(&mut self) -> usize {
        let mut derived = Vec::new();
        for (coin_id, coin) in &self.coins {
            for origin in self.profile.origins.keys() {
                if origin == coin_id || coin.relates_to(origin) {
                    continue;
                }
                if let Some(reverse) = self
                    .coins
                    .get(origin)
                    .and_then(|origin_coin| origin_coin.relationship(coin_id))
                {
                    derived.push((coin_id.clone(), origin.clone(), reverse.inverted()));
                }
            }
        }

        let count = derived.len();
        for (coin_id, origin, relationship) in derived {
            debug!("Derived {coin_id} -> {origin} by inversion");
            self.coin_entry(&coin_id)
                .relationships
                .insert(origin, relationship);
        }
        count
    }

    /// Converts `quantity` of `input` into `output`, net of the fee.
    ///
    /// Uses the direct relationship when present, otherwise the reciprocal of the reverse
    /// relationship.
    ///
    /// # Returns
    ///
    /// `None` when the two coins are not related in either direction
    #[must_use]
    pub fn convert(&self, input: &CoinId, output: &CoinId, quantity: &BigDecimal) -> Option<Conversion> {
        let fee_rate = &self.profile.fee_rate;
        if let Some(direct) = self.relationship(input, output) {
            return Some(Conversion::through(direct, quantity, fee_rate));
        }
        self.relationship(output, input)
            .map(|reverse| Conversion::through(&reverse.inverted(), quantity, fee_rate))
    }

    /// The price side a route leg is valued at: the ask along a native market, the bid
    /// otherwise
    #[must_use]
    pub fn leg_side(&self, input: &CoinId, output: &CoinId) -> PriceSide {
        if self.profile.is_native_market(input, output) {
            PriceSide::Ask
        } else {
            PriceSide::Bid
        }
    }

    /// Converts one route leg, valued at the side `leg_side` picks.
    ///
    /// # Returns
    ///
    /// `None` when the coins are not convertible or the chosen rate is absent
    #[must_use]
    pub fn convert_leg(&self, input: &CoinId, output: &CoinId, quantity: &BigDecimal) -> Option<BigDecimal> {
        let side = self.leg_side(input, output);
        self.convert(input, output, quantity)
            .and_then(|conversion| conversion.amount(side).cloned())
    }

    /// The direct relationship `from -> to`, if any
    #[must_use]
    pub fn relationship(&self, from: &CoinId, to: &CoinId) -> Option<&Relationship> {
        self.coins.get(from).and_then(|coin| coin.relationship(to))
    }

    /// Whether the snapshot quoted `pair` under that exact name. Relationships derived by
    /// inversion are not listed.
    #[must_use]
    pub fn is_listed(&self, pair: &Pair) -> bool {
        self.listed.contains(pair)
    }

    /// A coin by id
    #[must_use]
    pub fn coin(&self, id: &CoinId) -> Option<&Coin> {
        self.coins.get(id)
    }

    /// All coin ids, in order
    pub fn coin_ids(&self) -> impl Iterator<Item = &CoinId> {
        self.coins.keys()
    }

    /// Number of coins known
    #[must_use]
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    /// Whether no coin is known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// The coin for `id`, created empty if missing
    fn coin_entry(&mut self, id: &CoinId) -> &mut Coin {
        self.coins
            .entry(id.clone())
            .or_insert_with(|| Coin::new(id.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_ingest_base_to_quote() {
        let profile = profile("0.0025", &[("BTC", "1")], &[], "BTC");
        let mut market = Market::new(&profile);
        let ingested = market.ingest(&[record("BTC-LTC", "0.02", "0.019", "0.0195")]);

        assert_eq!(ingested, 1);
        let relationship = market.relationship(&coin("LTC"), &coin("BTC")).unwrap();
        assert_eq!(relationship.ask, Some(dec("0.02")));
        assert_eq!(relationship.bid, Some(dec("0.019")));
        assert_eq!(relationship.last, Some(dec("0.0195")));
        assert!(market.relationship(&coin("BTC"), &coin("LTC")).is_none());
    }

    #[test]
    fn test_ingest_later_record_wins() {
        let profile = profile("0.0025", &[("BTC", "1")], &[], "BTC");
        let mut market = Market::new(&profile);
        let ingested = market.ingest(&[
            record("BTC-LTC", "0.02", "0.019", "0.0195"),
            record("BTC-LTC", "0.03", "0.029", "0.0295"),
        ]);

        assert_eq!(ingested, 2);
        let relationship = market.relationship(&coin("LTC"), &coin("BTC")).unwrap();
        assert_eq!(relationship.ask, Some(dec("0.03")));
        assert_eq!(relationship.bid, Some(dec("0.029")));
        assert_eq!(relationship.last, Some(dec("0.0295")));
        assert_eq!(market.coin(&coin("LTC")).unwrap().relationships.len(), 1);
    }

    #[test]
    fn test_derived_relationships_are_not_listed() {
        let profile = profile("0.0025", &[("BTC", "1"), ("USDT", "1")], &[], "USDT");
        let market = market(&profile, &[record("USDT-BTC", "20000", "19800", "19900")]);

        assert!(market.relationship(&coin("USDT"), &coin("BTC")).is_some());
        assert!(market.is_listed(&"USDT-BTC".parse().unwrap()));
        assert!(!market.is_listed(&"BTC-USDT".parse().unwrap()));
    }

    #[test]
    fn test_ingest_skips_zero_and_malformed_quotes() {
        let profile = profile("0.0025", &[("BTC", "1")], &[], "BTC");
        let mut market = Market::new(&profile);
        let ingested = market.ingest(&[
            record("BTC-LTC", "0", "0.019", "0.0195"),
            record("BTC-XRP", "0.0001", "0", "0.0001"),
            record("BTC-DOGE", "0.0001", "0.0001", "0"),
            record("BTCNEO", "1", "1", "1"),
        ]);

        assert_eq!(ingested, 0);
        assert!(market.coin(&coin("LTC")).is_none());
        assert!(market.coin(&coin("NEO")).is_none());
    }

    #[test]
    fn test_ingest_adds_every_origin() {
        let profile = profile("0.0025", &[("BTC", "1"), ("ETH", "1"), ("USDT", "1")], &[], "USDT");
        let mut market = Market::new(&profile);
        market.ingest(&[]);

        assert_eq!(market.len(), 3);
        for origin in ["BTC", "ETH", "USDT"] {
            assert!(market.coin(&coin(origin)).unwrap().relationships.is_empty());
        }
    }

    #[test]
    fn test_complete_derives_reciprocal() {
        let profile = profile("0.0025", &[("BTC", "1"), ("USDT", "1")], &[], "USDT");
        let mut market = Market::new(&profile);
        market.ingest(&[record("USDT-BTC", "20000", "19800", "19900")]);
        let derived = market.complete();

        assert_eq!(derived, 1);
        let derived = market.relationship(&coin("USDT"), &coin("BTC")).unwrap();
        assert_eq!(derived.ask, Some(dec("1") / dec("20000")));
        assert_eq!(derived.bid, Some(dec("1") / dec("19800")));
        assert_eq!(derived.last, Some(dec("1") / dec("19900")));
    }

    #[test]
    fn test_complete_keeps_ingested_relationships() {
        let profile = profile("0.0025", &[("BTC", "1"), ("USDT", "1")], &[], "USDT");
        let mut market = Market::new(&profile);
        market.ingest(&[
            record("USDT-BTC", "20000", "19800", "19900"),
            record("BTC-USDT", "0.00004", "0.00003", "0.000035"),
        ]);

        assert_eq!(market.complete(), 0);
        let kept = market.relationship(&coin("USDT"), &coin("BTC")).unwrap();
        assert_eq!(kept.ask, Some(dec("0.00004")));
    }

    #[test]
    fn test_complete_only_towards_origins() {
        let profile = profile("0.0025", &[("BTC", "1")], &[], "BTC");
        let mut market = Market::new(&profile);
        market.ingest(&[record("LTC-XRP", "0.01", "0.01", "0.01")]);

        assert_eq!(market.complete(), 0);
        assert!(market.relationship(&coin("LTC"), &coin("XRP")).is_none());
    }

    #[test]
    fn test_convert_no_phantom_rates() {
        let profile = profile("0.0025", &[("BTC", "1"), ("ETH", "1")], &[], "BTC");
        let market = market(&profile, &[record("BTC-LTC", "0.02", "0.019", "0.0195")]);
        for quantity in ["0", "1", "123.456"] {
            assert!(market.convert(&coin("ETH"), &coin("LTC"), &dec(quantity)).is_none());
            assert!(market.convert(&coin("LTC"), &coin("ETH"), &dec(quantity)).is_none());
            assert!(market.convert(&coin("NOPE"), &coin("BTC"), &dec(quantity)).is_none());
        }
    }

    #[test]
    fn test_convert_direct_and_reverse() {
        let profile = profile("0.5", &[("ETH", "1")], &[], "ETH");
        let mut market = Market::new(&profile);
        market.ingest(&[record("ETH-LTC", "4", "2", "8")]);

        let direct = market.convert(&coin("LTC"), &coin("ETH"), &dec("10")).unwrap();
        assert_eq!(direct.ask, Some(dec("20")));
        assert_eq!(direct.bid, Some(dec("10")));
        assert_eq!(direct.last, Some(dec("40")));

        let reverse = market.convert(&coin("ETH"), &coin("LTC"), &dec("10")).unwrap();
        assert_eq!(reverse.ask, Some(dec("1.25")));
        assert_eq!(reverse.bid, Some(dec("2.5")));
        assert_eq!(reverse.last, Some(dec("0.625")));
    }

    #[test]
    fn test_convert_fee_monotonicity() {
        for (fee, strictly_less) in [("0.0025", true), ("0", false)] {
            let profile = profile(fee, &[("BTC", "1")], &[], "BTC");
            let market = market(&profile, &[record("BTC-LTC", "0.02", "0.019", "0.0195")]);
            let quantity = dec("3");
            let gross = &quantity * &dec("0.019");
            let bid = market
                .convert(&coin("LTC"), &coin("BTC"), &quantity)
                .unwrap()
                .bid
                .unwrap();
            if strictly_less {
                assert!(bid < gross);
            } else {
                assert_eq!(bid, gross);
            }
        }
    }

    #[test]
    fn test_leg_side() {
        let profile = profile("0.0025", &[("BTC", "1"), ("ETH", "1")], &["BTC-ETH"], "BTC");
        let market = market(&profile, &[]);
        assert_eq!(market.leg_side(&coin("BTC"), &coin("ETH")), PriceSide::Ask);
        assert_eq!(market.leg_side(&coin("ETH"), &coin("BTC")), PriceSide::Bid);
    }
}
