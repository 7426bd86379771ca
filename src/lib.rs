/*!
 * # Vessel - Triangular Arbitrage Detection
 *
 * Vessel polls a centralized exchange's top-of-book quotes and looks for
 * three-leg conversion routes that return more of a currency than they stake.
 *
 * ## Core Features
 *
 * - **Relationship Graph**: Builds per-coin conversion rates from a market snapshot and
 *   derives missing edges towards origin currencies by inversion
 * - **Fee-aware Conversion**: Converts quantities at ask, bid and last, net of the venue fee
 * - **Path Enumeration**: Quotes every `origin -> vessel -> destination -> origin` route
 *   within each origin's stake limit and available balance
 * - **Ranking**: Orders routes by gain expressed in the settlement currency
 * - **Single-flight Polling**: Runs one detection cycle at a time on a fixed interval
 *
 * ## Module Structure
 *
 * - `arb`: Detection engine
 * - `bot`: Polling scheduler
 * - `config`: Exchange profiles and runtime configuration
 * - `execution`: Sinks for selected routes
 * - `notify`: Slack notifications
 * - `report`: Cycle report rendering
 * - `sync`: Market data and balance sources
 * - `utils`: Constants and logging
 */

/// Triangular arbitrage detection
pub mod arb;
/// Polling scheduler
pub mod bot;
/// Configuration management for the system
pub mod config;
/// Sinks for selected routes
pub mod execution;
/// Notifications
pub mod notify;
/// Cycle report rendering
pub mod report;
/// Market data and balance sources
pub mod sync;
/// Utility functions and helpers
pub mod utils;
