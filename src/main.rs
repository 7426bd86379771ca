use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use eyre::{Error, Result};
use itertools::Itertools;
use log::info;
use vessel::bot::Bot;
use vessel::config::Config;
use vessel::execution::LogSink;
use vessel::notify::SlackNotifier;
use vessel::sync::{HttpMarketSource, Snapshot, StaticBalanceSource};
use vessel::utils::logger::setup_logger;

/// Triangular arbitrage detection
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// What to do
    #[command(subcommand)]
    command: Option<Commands>,
    /// Mark selected routes live
    #[arg(long, global = true)]
    live: bool,
    /// Print every path, not only the best of each route
    #[arg(long, global = true)]
    details: bool,
}

/// Commands
#[derive(Subcommand)]
enum Commands {
    /// Poll the exchange until Ctrl-C (default)
    Run,
    /// Run one cycle over a recorded snapshot
    Scan {
        /// JSON file with `markets` and `balances`
        snapshot: PathBuf,
    },
}

/// Polls the exchange with the sink the configuration asks for
async fn run(config: &Config, live: bool, details: bool) -> Result<(), Error> {
    info!(
        "Watching {} with origins {}",
        config.api_url,
        config.profile.origins.keys().join(", ")
    );
    let markets = HttpMarketSource::new(&config.api_url)?;
    let balances = StaticBalanceSource::new(config.balances.clone());

    match &config.slack_token {
        Some(token) => {
            let sink = SlackNotifier::new(token.clone())?;
            Bot::new(config, markets, balances, sink)
                .live(live)
                .details(details)
                .run()
                .await;
        }
        None => {
            Bot::new(config, markets, balances, LogSink)
                .live(live)
                .details(details)
                .run()
                .await;
        }
    }
    Ok(())
}

/// One offline cycle
async fn scan(config: &Config, path: &Path, live: bool, details: bool) -> Result<(), Error> {
    let snapshot = Snapshot::load(path).await?;
    let bot = Bot::new(config, snapshot.clone(), snapshot, LogSink)
        .live(live)
        .details(details);
    match bot.run_cycle().await? {
        Some(plan) => println!("\nSelected route:\n{plan}"),
        None => println!("\nNo profitable route"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_logger()?;

    let cli = Cli::parse();

    let config = Config::from_env()?;
    match cli.command {
        Some(Commands::Scan { snapshot }) => {
            scan(&config, &snapshot, cli.live, cli.details).await?;
        }
        Some(Commands::Run) | None => {
            run(&config, cli.live, cli.details).await?;
        }
    }

    Ok(())
}
