/// Extract Module
///
/// Handles downloading the raw DShield feed over HTTP with bounded retries,
/// linear backoff, and `Retry-After` handling for rate limiting.
use anyhow::{Context, Result};
use reqwest::{header::RETRY_AFTER, Client, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::{DEFAULT_BACKOFF_SECS, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};

/// Characters of an error body kept in log lines
const LOG_BODY_LIMIT: usize = 200;

/// Retry and timeout settings for feed downloads
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub max_retries: usize,
    /// Scaled by the 1-based attempt number between attempts
    pub backoff: Duration,
    pub timeout: Duration,
}

impl FetchConfig {
    /// Linear backoff for a 1-based attempt, saturating instead of overflowing
    pub fn backoff_for(&self, attempt: usize) -> Duration {
        self.backoff.saturating_mul(u32::try_from(attempt).unwrap_or(u32::MAX))
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: Duration::from_secs_f64(DEFAULT_BACKOFF_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Result of a fetch: the final HTTP status and body
///
/// Status 0 with an empty body means every attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub status: u16,
    pub body: String,
}

impl FetchOutcome {
    pub fn failed() -> Self {
        Self { status: 0, body: String::new() }
    }

    pub fn is_failed(&self) -> bool {
        self.status == 0
    }
}

pub struct FeedFetcher {
    client: Client,
    config: FetchConfig,
}

impl FeedFetcher {
    /// Create a new fetcher with a per-attempt timeout
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch `url`, retrying up to `max_retries` times
    ///
    /// Never fails: exhaustion yields `FetchOutcome::failed()`.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let max_retries = self.config.max_retries;

        for attempt in 1..=max_retries {
            tracing::debug!("Fetching {} (attempt {}/{})", url, attempt, max_retries);

            match self.client.get(url).send().await {
                Ok(resp) if resp.status() == StatusCode::TOO_MANY_REQUESTS => {
                    let wait_for = retry_after(resp.headers()).unwrap_or_else(|| self.config.backoff_for(attempt));
                    tracing::warn!("Rate limited (429). Backing off {:.1}s...", wait_for.as_secs_f64());
                    sleep(wait_for).await;
                    continue;
                }
                Ok(resp) if resp.status().is_success() => {
                    let status = resp.status().as_u16();
                    match resp.text().await {
                        Ok(body) => {
                            tracing::info!("Fetched {} bytes from {} (HTTP {})", body.len(), url, status);
                            return FetchOutcome { status, body };
                        }
                        Err(e) => {
                            tracing::warn!("Request error (attempt {}/{}): {}", attempt, max_retries, e);
                        }
                    }
                }
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    let body = resp.text().await.unwrap_or_default();
                    tracing::warn!("HTTP {}: {}", status, truncate(&body, LOG_BODY_LIMIT));
                }
                Err(e) => {
                    tracing::warn!("Request error (attempt {}/{}): {}", attempt, max_retries, e);
                }
            }

            sleep(self.config.backoff_for(attempt)).await;
        }

        tracing::error!("Giving up on {} after {} attempts", url, max_retries);
        FetchOutcome::failed()
    }
}

/// Fetch the feed and keep it only if there is something to parse
pub async fn extract_feed(fetcher: &FeedFetcher, url: &str) -> Option<String> {
    let outcome = fetcher.fetch(url).await;

    if outcome.is_failed() || outcome.body.trim().is_empty() {
        tracing::error!("Failed to fetch or empty payload (status {}).", outcome.status);
        return None;
    }

    Some(outcome.body)
}

/// Parse a delay-seconds `Retry-After` header
fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
