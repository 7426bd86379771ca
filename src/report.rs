//! Human-readable cycle report.
//!
//! ```text
//! Origin : BTC at <stake>
//!   Direct BTC -> ETH : <amount>
//!   Indirect BTC -> LTC -> ETH -> BTC : <final amount>
//!   Gain : <gain> BTC (<gain> USDT)
//! ```

use bigdecimal::BigDecimal;
use itertools::Itertools;

use crate::arb::market::Market;
use crate::arb::path::ArbitragePath;
use crate::arb::ranking::{normalized_gain, RankedPaths};

/// Decimal places amounts are printed with
const PRECISION: i64 = 8;

/// Renders every ranked route, best first. Without `details` only the best path of each
/// route is listed.
#[must_use]
pub fn render(ranked: &RankedPaths, market: &Market<'_>, details: bool) -> String {
    if ranked.is_empty() {
        return "No convertible routes".to_string();
    }
    let take = if details { usize::MAX } else { 1 };

    ranked
        .routes()
        .iter()
        .flat_map(|route| {
            let best = route.best();
            let header = format!("Origin : {} at {}", best.origin, amount(&best.stake));
            let direct = best.direct.as_ref().map(|direct| {
                format!("  Direct {} -> {} : {}", best.origin, best.destination, amount(direct))
            });
            let paths = route
                .paths()
                .iter()
                .take(take)
                .flat_map(move |path| path_lines(market, path));
            std::iter::once(header).chain(direct).chain(paths)
        })
        .join("\n")
}

/// The indirect amount and gain of one path
fn path_lines(market: &Market<'_>, path: &ArbitragePath) -> [String; 2] {
    let settlement = &market.profile().settlement;
    let normalized = normalized_gain(market, path).map_or_else(
        || format!("not convertible to {settlement}"),
        |gain| format!("{} {settlement}", amount(&gain)),
    );
    [
        format!("  Indirect {path} : {}", amount(&path.final_amount)),
        format!("  Gain : {} {} ({normalized})", amount(&path.gain), path.origin),
    ]
}

/// Rounds for display
fn amount(value: &BigDecimal) -> BigDecimal {
    value.round(PRECISION).normalized()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::detect::Detection;
    use crate::arb::test_helpers::*;

    #[test]
    fn test_render_best_only() {
        let profile = sample_profile();
        let detection = Detection::run(&profile, &sample_records(), &portfolio(&[("BTC", "1")]));
        let text = render(&detection.ranked, &detection.market, false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Origin : BTC at 0.0072");
        assert!(lines[1].starts_with("  Direct BTC -> "));
        assert!(lines[2].starts_with("  Indirect BTC -> LTC -> ETH -> BTC : "));
        assert!(lines[3].starts_with("  Gain : "));
        assert!(lines[3].ends_with(" USDT)"));
        assert_eq!(
            text.matches("Origin : ").count(),
            detection.ranked.len()
        );
        assert_eq!(
            text.matches("Indirect ").count(),
            detection.ranked.len()
        );
    }

    #[test]
    fn test_render_details_lists_every_path() {
        let profile = sample_profile();
        let detection = Detection::run(&profile, &sample_records(), &portfolio(&[("BTC", "1")]));
        let text = render(&detection.ranked, &detection.market, true);
        let paths: usize = detection
            .ranked
            .routes()
            .iter()
            .map(|route| route.paths().len())
            .sum();

        assert_eq!(text.matches("Indirect ").count(), paths);
        assert!(paths > detection.ranked.len());
    }

    #[test]
    fn test_render_empty() {
        let profile = sample_profile();
        let market = market(&profile, &[]);
        assert_eq!(
            render(&RankedPaths::default(), &market, true),
            "No convertible routes"
        );
    }

    #[test]
    fn test_amount_rounding() {
        assert_eq!(amount(&dec("0.123456789123")).to_string(), "0.12345679");
        assert_eq!(amount(&dec("0.0072000")).to_string(), "0.0072");
    }
}
