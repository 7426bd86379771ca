/// Sync balances
///
/// This module contains the balance sources and the process-wide balance cache.
///
/// # Errors
/// Returns an error if a balance source fails
pub mod balances;
/// Sync market summaries
///
/// This module contains the market data sources, including the venue's HTTP API.
///
/// # Errors
/// Returns an error if the venue cannot be reached or answers with a failure
pub mod market_summaries;
/// Recorded snapshots
///
/// This module contains the JSON snapshot used for offline scans.
pub mod snapshot;

pub use balances::{BalanceCache, BalanceSource, StaticBalanceSource};
pub use market_summaries::{HttpMarketSource, MarketSource};
pub use snapshot::Snapshot;
