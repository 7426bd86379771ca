use std::future::Future;
use std::time::Duration;

use eyre::{eyre, Result, WrapErr};
use log::{error, info};
use tokio::time::{self, MissedTickBehavior};

use crate::arb::detect::Detection;
use crate::arb::route::RoutePlan;
use crate::config::{Config, ExchangeProfile};
use crate::execution::{mode, ExecutionSink};
use crate::report;
use crate::sync::{BalanceCache, BalanceSource, MarketSource};

/// Polls market data and runs one detection cycle at a time
#[derive(Debug)]
pub struct Bot<M, B, S> {
    /// Venue rules
    profile: ExchangeProfile,
    /// Where snapshots come from
    markets: M,
    /// Where balances come from
    balance_source: B,
    /// Balances as of the last refresh
    balances: BalanceCache,
    /// Where selected routes go
    sink: S,
    /// Time between cycle starts
    poll_interval: Duration,
    /// Upper bound for one cycle
    cycle_timeout: Duration,
    /// Whether selections are marked live
    live: bool,
    /// Whether the report lists every path
    details: bool,
}

impl<M, B, S> Bot<M, B, S>
where
    M: MarketSource,
    B: BalanceSource,
    S: ExecutionSink,
{
    /// Creates a bot in dry-run mode with the short report
    #[must_use]
    pub fn new(config: &Config, markets: M, balance_source: B, sink: S) -> Self {
        Self {
            profile: config.profile.clone(),
            markets,
            balance_source,
            balances: BalanceCache::new(),
            sink,
            poll_interval: config.poll_interval,
            cycle_timeout: config.cycle_timeout,
            live: false,
            details: false,
        }
    }

    /// Marks selections live
    #[must_use]
    pub const fn live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    /// Lists every path in the report
    #[must_use]
    pub const fn details(mut self, details: bool) -> Self {
        self.details = details;
        self
    }

    /// The balance cache
    #[must_use]
    pub const fn balances(&self) -> &BalanceCache {
        &self.balances
    }

    /// Runs one full cycle: fetch, refresh balances, detect, report, hand off.
    ///
    /// # Returns
    ///
    /// The plan handed to the sink, if any route gains
    ///
    /// # Errors
    ///
    /// Returns an error if a collaborator fails; nothing is handed off in that case
    pub async fn run_cycle(&self) -> Result<Option<RoutePlan>> {
        let records = self
            .markets
            .market_summaries()
            .await
            .wrap_err("Market data unavailable")?;
        self.balances
            .refresh(&self.balance_source)
            .await
            .wrap_err("Balances unavailable")?;
        let portfolio = self.balances.snapshot().await;

        let detection = Detection::run(&self.profile, &records, &portfolio);
        println!(
            "{}",
            report::render(&detection.ranked, &detection.market, self.details)
        );

        let Some(plan) = detection.best_plan() else {
            info!("No profitable route");
            return Ok(None);
        };
        self.sink
            .execute(&plan, self.live)
            .await
            .wrap_err("Execution sink failed")?;
        Ok(Some(plan))
    }

    /// Runs one cycle under the cycle timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the cycle fails or does not finish in time
    pub async fn timed_cycle(&self) -> Result<Option<RoutePlan>> {
        time::timeout(self.cycle_timeout, self.run_cycle())
            .await
            .map_err(|_| eyre!("Cycle exceeded {:?}", self.cycle_timeout))?
    }

    /// Polls until Ctrl-C
    pub async fn run(&self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Cannot listen for Ctrl-C: {e}");
            }
        })
        .await;
    }

    /// Polls until `shutdown` completes. A cycle always runs to completion or timeout
    /// before the next one starts; ticks missed meanwhile are skipped.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut interval = time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(
            "Bot started: polling every {:?}, {} mode",
            self.poll_interval,
            mode(self.live)
        );
        let mut cycle: u64 = 0;
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Received shutdown signal after {cycle} cycles");
                    break;
                }
                _ = interval.tick() => {}
            }

            cycle += 1;
            info!("Cycle {cycle} started");
            match self.timed_cycle().await {
                Ok(Some(plan)) => info!("Cycle {cycle} finished, selected {}", plan.path),
                Ok(None) => info!("Cycle {cycle} finished"),
                Err(e) => {
                    let failure = format!("Cycle {cycle} abandoned: {e:#}");
                    error!("{failure}");
                    if let Err(report_err) = self.sink.cycle_failed(&failure).await {
                        error!("Cannot report abandoned cycle: {report_err:#}");
                    }
                }
            }
        }
    }
}
