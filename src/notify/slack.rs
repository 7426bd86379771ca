use eyre::Result;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::arb::route::RoutePlan;
use crate::execution::{mode, ExecutionSink};

/// Channel route plans are posted to
const ROUTES_CHANNEL: &str = "#vessel";
/// Channel errors are posted to
const ERRORS_CHANNEL: &str = "#vessel-errors";

/// Slack notifier
#[derive(Debug)]
pub struct SlackNotifier {
    /// The Slack OAuth token
    token: String,
    /// The HTTP client
    client: Client,
}

impl SlackNotifier {
    /// Create a new Slack notifier
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(token: impl Into<String>) -> Result<Self> {
        // Create a client with a timeout
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            token: token.into(),
            client,
        })
    }

    /// Send a message to a specific channel
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Slack rejects the message
    pub async fn send_to(&self, msg: &str, channel: &str) -> Result<()> {
        let response = self
            .client
            .post("https://slack.com/api/chat.postMessage")
            .bearer_auth(&self.token)
            .json(&payload(msg, channel))
            .send()
            .await?
            .json::<Value>()
            .await?;

        check_response(&response)
    }

    /// Send a message to the default channel
    ///
    /// # Errors
    ///
    /// See [`SlackNotifier::send_to`]
    pub async fn send(&self, msg: &str) -> Result<()> {
        self.send_to(msg, ROUTES_CHANNEL).await
    }

    /// Send an error message to the error channel
    ///
    /// # Errors
    ///
    /// See [`SlackNotifier::send_to`]
    pub async fn send_error(&self, error: &str) -> Result<()> {
        self.send_to(&format!(":warning: Error: {error}"), ERRORS_CHANNEL)
            .await
    }
}

impl ExecutionSink for SlackNotifier {
    async fn execute(&self, plan: &RoutePlan, live: bool) -> Result<()> {
        self.send(&format!("Route ({}):\n```{plan}```", mode(live))).await
    }

    async fn cycle_failed(&self, error: &str) -> Result<()> {
        self.send_error(error).await
    }
}

/// `chat.postMessage` body
fn payload(msg: &str, channel: &str) -> Value {
    json!({
        "channel": channel,
        "text": msg,
        "username": "Vessel",
        "icon_emoji": ":ship:"
    })
}

/// Slack answers 200 with `ok: false` on failure
fn check_response(response: &Value) -> Result<()> {
    if !response["ok"].as_bool().unwrap_or(false) {
        return Err(eyre::eyre!(
            "Slack API error: {}",
            response["error"].as_str().unwrap_or("unknown error")
        ));
    }
    Ok(())
}
