/// Bittrex public API base
pub const BITTREX_API_URL: &str = "https://bittrex.com/api/v1.1";
/// Bittrex taker fee per trade
pub const BITTREX_FEE_RATE: &str = "0.0025";
/// Bittrex stakeable currencies and their maximum stake
pub const BITTREX_ORIGINS: &str = "BTC:0.0072,ETH:0.072,USDT:100";
/// Bittrex markets between origin currencies, as listed by the venue
pub const BITTREX_MARKETS: &str = "BTC-ETH,USDT-BTC,USDT-ETH";
/// Bittrex settlement currency
pub const BITTREX_SETTLEMENT: &str = "USDT";

/// Seconds between polls
pub const DEFAULT_POLL_SECS: u64 = 10;
/// Seconds one detection cycle may take before it is abandoned
pub const DEFAULT_CYCLE_TIMEOUT_SECS: u64 = 30;
