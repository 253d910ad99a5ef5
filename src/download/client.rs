//! HTTP client wrapper with transparent retry on throttling.
//!
//! This module provides the `HttpClient` struct: one pooled `reqwest::Client`
//! shared by every request of a run, plus the [`ThrottlePolicy`] applied when
//! the upstream answers HTTP 429.

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::{debug, info, instrument};

use super::constants::{CONNECT_TIMEOUT_SECS, TOO_MANY_REQUESTS};
use super::error::DownloadError;
use super::redact::redact_url;
use super::throttle::{ThrottleDecision, ThrottlePolicy};

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/wallhaven-dl";

/// HTTP client that retries throttled requests.
///
/// Created once per run and shared by reference; cloning is cheap and shares
/// the underlying connection pool. Dropping the last clone closes pooled
/// connections.
///
/// # Example
///
/// ```no_run
/// use wallhaven_core::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let response = client.fetch("https://wallhaven.cc/api/v1/search?page=1").await?;
/// println!("status: {}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    throttle: ThrottlePolicy,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with the default throttle policy (10s cooldown, retry forever).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::with_throttle_policy(ThrottlePolicy::default())
    }

    /// Creates a client with an explicit throttle policy.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    #[instrument(level = "debug")]
    pub fn with_throttle_policy(throttle: ThrottlePolicy) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client, throttle }
    }

    /// Returns the throttle policy in effect.
    #[must_use]
    pub fn throttle_policy(&self) -> &ThrottlePolicy {
        &self.throttle
    }

    /// Sends a GET request, re-sending it after a cooldown whenever the server
    /// answers 429.
    ///
    /// Every other status, success or not, is returned to the caller as-is.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::Network`] / [`DownloadError::Timeout`] on transport failure
    /// - [`DownloadError::Throttled`] when a bounded throttle policy is exhausted
    #[instrument(skip(self), fields(url = %redact_url(url)))]
    pub async fn fetch(&self, url: &str) -> Result<Response, DownloadError> {
        let mut throttled_attempts = 0u32;

        loop {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| DownloadError::from_reqwest(url, e))?;

            if response.status().as_u16() != TOO_MANY_REQUESTS {
                debug!(status = response.status().as_u16(), "response received");
                return Ok(response);
            }

            // Discard the throttled body before sleeping so the connection is released.
            drop(response);
            throttled_attempts += 1;

            match self.throttle.decide(throttled_attempts) {
                ThrottleDecision::Wait(cooldown) => {
                    info!(
                        attempt = throttled_attempts,
                        cooldown_ms = cooldown.as_millis(),
                        "throttled by server, cooling down"
                    );
                    tokio::time::sleep(cooldown).await;
                }
                ThrottleDecision::GiveUp => {
                    return Err(DownloadError::throttled(url, throttled_attempts));
                }
            }
        }
    }
}

/// Default User-Agent (identifies the tool).
fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("wallhaven-dl/{version} (+{PROJECT_UA_URL})")
}
