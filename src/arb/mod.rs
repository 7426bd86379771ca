//! # Arbitrage Module
//!
//! This module contains the triangular arbitrage detection engine.
//! It builds a coin relationship graph from a market snapshot, converts
//! quantities through it net of fees, enumerates three-leg routes and ranks them.

/// Coins and their relationships
pub mod coin;
/// Fee-aware conversion amounts
pub mod conversion;
/// One full detection cycle
pub mod detect;
/// Relationship graph of a snapshot
pub mod market;
/// Three-leg paths and their enumeration
pub mod path;
/// Balances and stake resolution
pub mod portfolio;
/// Ranking and selection of paths
pub mod ranking;
/// Order plans for selected paths
pub mod route;
/// Test helpers and utilities
#[cfg(test)]
pub(crate) mod test_helpers;
/// Common type definitions
pub mod types;
