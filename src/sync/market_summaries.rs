use std::str::FromStr;
use std::time::Duration;

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDateTime;
use eyre::{bail, eyre, Result};
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Number;
use url::Url;

use crate::arb::types::QuoteRecord;

/// Supplies one market snapshot per cycle
#[allow(async_fn_in_trait)]
pub trait MarketSource {
    /// Top-of-book quotes for every active market
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be fetched; the cycle is then abandoned
    async fn market_summaries(&self) -> Result<Vec<QuoteRecord>>;
}

/// Envelope every v1.1 public endpoint answers with
#[derive(Debug, Deserialize)]
struct Envelope {
    /// Whether the call succeeded
    success: bool,
    /// Error text when it did not
    #[serde(default)]
    message: String,
    /// Payload
    #[serde(default)]
    result: Option<Vec<MarketSummary>>,
}

/// One entry of `getmarketsummaries`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MarketSummary {
    /// `QUOTE-BASE`
    market_name: String,
    /// Lowest ask
    ask: Option<Number>,
    /// Highest bid
    bid: Option<Number>,
    /// Last trade
    last: Option<Number>,
    /// Quote time
    time_stamp: Option<String>,
}

impl MarketSummary {
    /// Converts to a quote record. Missing prices become zero, which ingestion skips.
    fn into_record(self) -> Result<QuoteRecord> {
        let price = |value: Option<Number>| -> Result<BigDecimal> {
            value.map_or_else(
                || Ok(BigDecimal::zero()),
                |number| {
                    BigDecimal::from_str(&number.to_string())
                        .map_err(|e| eyre!("Bad price {number} for {}: {e}", self.market_name))
                },
            )
        };
        let ask = price(self.ask.clone())?;
        let bid = price(self.bid.clone())?;
        let last = price(self.last.clone())?;
        let timestamp = self
            .time_stamp
            .as_deref()
            .and_then(|time| NaiveDateTime::from_str(time).ok());
        Ok(QuoteRecord {
            market_name: self.market_name,
            ask,
            bid,
            last,
            timestamp,
        })
    }
}

/// Parses a `getmarketsummaries` response body
///
/// # Errors
///
/// Returns an error if the body is not an envelope, reports failure, or has bad prices
pub fn parse_market_summaries(body: &str) -> Result<Vec<QuoteRecord>> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if !envelope.success {
        bail!("Market summaries request failed: {}", envelope.message);
    }
    envelope
        .result
        .unwrap_or_default()
        .into_iter()
        .map(MarketSummary::into_record)
        .collect()
}

/// Reads market summaries from the venue's public HTTP API
#[derive(Debug, Clone)]
pub struct HttpMarketSource {
    /// The HTTP client
    client: Client,
    /// Full URL of the summaries endpoint
    url: Url,
}

impl HttpMarketSource {
    /// Creates a source for the API rooted at `api_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be formed or the client cannot be built
    pub fn new(api_url: &Url) -> Result<Self> {
        let mut base = api_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let url = base.join("public/getmarketsummaries")?;
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        info!("Market summaries from {url}");
        Ok(Self { client, url })
    }

    /// The endpoint queried
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl MarketSource for HttpMarketSource {
    async fn market_summaries(&self) -> Result<Vec<QuoteRecord>> {
        let body = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let records = parse_market_summaries(&body)?;
        debug!("Fetched {} market summaries", records.len());
        Ok(records)
    }
}
