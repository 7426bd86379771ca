use eyre::Result;
use log::info;

use crate::arb::route::RoutePlan;

/// Receives the selected route of a cycle
#[allow(async_fn_in_trait)]
pub trait ExecutionSink {
    /// Handles a profitable route plan.
    ///
    /// `live` reflects the process-wide flag; no sink in this crate places orders either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan cannot be delivered
    async fn execute(&self, plan: &RoutePlan, live: bool) -> Result<()>;

    /// Reports a cycle that was abandoned. The failure is already logged, so the default
    /// does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be delivered
    async fn cycle_failed(&self, _error: &str) -> Result<()> {
        Ok(())
    }
}

/// Writes route plans to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

/// Label of the `live` flag in messages
#[must_use]
pub const fn mode(live: bool) -> &'static str {
    if live {
        "live"
    } else {
        "dry run"
    }
}

impl ExecutionSink for LogSink {
    async fn execute(&self, plan: &RoutePlan, live: bool) -> Result<()> {
        info!("Selected route ({}): {}", mode(live), plan.to_string().trim_end());
        Ok(())
    }
}
