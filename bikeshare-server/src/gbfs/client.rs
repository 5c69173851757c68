//! GBFS HTTP client.
//!
//! Fetches JSON feed documents with a bounded number of attempts. Every
//! non-2xx status and every transport failure is retried the same way.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::error::{FetchCause, FetchError};

/// Default number of attempts per document.
const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Default pause between attempts.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A source of feed documents.
///
/// The pipeline only ever asks for a URL and gets back parsed JSON or a
/// [`FetchError`], so tests can drive it from memory.
pub trait FeedSource: Send + Sync {
    /// Fetch and parse the JSON document at `url`, retrying per the
    /// source's policy.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// How many times to try a document and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    /// A policy with no pause between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Configuration for the GBFS client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Total attempts per document
    pub max_attempts: u32,
    /// Pause between attempts
    pub retry_delay: Duration,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl FetchConfig {
    /// Set the number of attempts per document.
    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the pause between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: self.retry_delay,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("bikeshare-server/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP client for GBFS feed documents.
#[derive(Debug, Clone)]
pub struct GbfsClient {
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl GbfsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            retry: config.retry_policy(),
        })
    }

    /// One GET, no retries.
    async fn attempt(&self, url: &str) -> Result<Value, FetchCause> {
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchCause::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchCause::Json(e.to_string()))
    }
}

impl FeedSource for GbfsClient {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        fetch_with_retry(url, &self.retry, || self.attempt(url)).await
    }
}

/// Run `attempt` until it succeeds, fails with a non-retryable cause, or the
/// policy's attempt budget is spent.
pub(crate) async fn fetch_with_retry<F, Fut>(
    url: &str,
    policy: &RetryPolicy,
    mut attempt: F,
) -> Result<Value, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Value, FetchCause>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;

        match attempt().await {
            Ok(value) => {
                debug!(url, attempts, "fetched feed document");
                return Ok(value);
            }
            Err(cause) => {
                warn!(url, attempt = attempts, max_attempts, %cause, "feed fetch attempt failed");

                if !cause.is_retryable() || attempts >= max_attempts {
                    return Err(FetchError {
                        url: url.to_string(),
                        attempts,
                        cause,
                    });
                }

                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }
}
