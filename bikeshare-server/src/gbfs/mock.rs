//! In-memory feed source for tests and offline development.
//!
//! Responses are registered per URL. Every fetch goes through the same retry
//! loop as the HTTP client, so attempt counts match what a live run would do.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use super::client::{FeedSource, RetryPolicy, fetch_with_retry};
use super::error::{FetchCause, FetchError};

/// What the mock answers for a single attempt.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 200 with this JSON body
    Json(Value),
    /// Non-2xx status
    Status(u16),
    /// Connection-level failure
    Transport(String),
    /// 200 with a body that is not JSON
    Garbage(String),
}

/// Feed source that answers from registered responses.
///
/// A URL may carry a script of responses: attempt *n* gets entry *n*, and the
/// last entry repeats once the script runs out. Unregistered URLs answer 404.
#[derive(Debug)]
pub struct MockFeedSource {
    scripts: HashMap<String, Vec<MockResponse>>,
    attempts: Mutex<HashMap<String, u32>>,
    retry: RetryPolicy,
}

impl MockFeedSource {
    /// Create an empty mock that retries up to 4 times without pausing.
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            attempts: Mutex::new(HashMap::new()),
            retry: RetryPolicy::immediate(4),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Serve `body` for every request to `url`.
    pub fn with_json(self, url: impl Into<String>, body: Value) -> Self {
        self.with_script(url, vec![MockResponse::Json(body)])
    }

    /// Fail every request to `url` with `status`.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.with_script(url, vec![MockResponse::Status(status)])
    }

    pub fn with_script(mut self, url: impl Into<String>, script: Vec<MockResponse>) -> Self {
        self.scripts.insert(url.into(), script);
        self
    }

    /// Number of attempts made against `url` so far.
    pub fn attempts(&self, url: &str) -> u32 {
        self.lock_attempts().get(url).copied().unwrap_or(0)
    }

    /// Number of attempts made against any URL so far.
    pub fn total_attempts(&self) -> u32 {
        self.lock_attempts().values().sum()
    }

    fn lock_attempts(&self) -> std::sync::MutexGuard<'_, HashMap<String, u32>> {
        self.attempts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn respond(&self, url: &str) -> Result<Value, FetchCause> {
        let n = {
            let mut attempts = self.lock_attempts();
            let count = attempts.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count as usize
        };

        let Some(script) = self.scripts.get(url).filter(|s| !s.is_empty()) else {
            return Err(FetchCause::Status(404));
        };

        match &script[(n - 1).min(script.len() - 1)] {
            MockResponse::Json(body) => Ok(body.clone()),
            MockResponse::Status(status) => Err(FetchCause::Status(*status)),
            MockResponse::Transport(message) => Err(FetchCause::Transport(message.clone())),
            MockResponse::Garbage(body) => {
                serde_json::from_str(body).map_err(|e| FetchCause::Json(e.to_string()))
            }
        }
    }
}

impl Default for MockFeedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSource for MockFeedSource {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        fetch_with_retry(url, &self.retry, || std::future::ready(self.respond(url))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn serves_registered_json() {
        let mock = MockFeedSource::new().with_json("a", json!({"data": {"stations": []}}));

        let doc = mock.fetch("a").await.unwrap();
        assert_eq!(doc, json!({"data": {"stations": []}}));
        assert_eq!(mock.attempts("a"), 1);
    }

    #[tokio::test]
    async fn unknown_url_is_404_after_retries() {
        let mock = MockFeedSource::new();

        let err = mock.fetch("nowhere").await.unwrap_err();
        assert_eq!(err.last_status(), Some(404));
        assert_eq!(mock.attempts("nowhere"), 4);
    }

    #[tokio::test]
    async fn script_advances_per_attempt() {
        let mock = MockFeedSource::new().with_script(
            "a",
            vec![
                MockResponse::Status(502),
                MockResponse::Transport("reset".into()),
                MockResponse::Json(json!({"ok": true})),
            ],
        );

        let doc = mock.fetch("a").await.unwrap();
        assert_eq!(doc, json!({"ok": true}));
        assert_eq!(mock.attempts("a"), 3);

        // Script is exhausted; last entry repeats.
        mock.fetch("a").await.unwrap();
        assert_eq!(mock.total_attempts(), 4);
    }

    #[tokio::test]
    async fn garbage_body_fails_once() {
        let mock = MockFeedSource::new()
            .with_script("a", vec![MockResponse::Garbage("<html>".into())]);

        let err = mock.fetch("a").await.unwrap_err();
        assert!(matches!(err.cause, FetchCause::Json(_)));
        assert_eq!(mock.attempts("a"), 1);
    }

    #[tokio::test]
    async fn retry_policy_is_configurable() {
        let mock = MockFeedSource::new()
            .with_retry(RetryPolicy::immediate(2))
            .with_status("a", 500);

        assert!(mock.fetch("a").await.is_err());
        assert_eq!(mock.attempts("a"), 2);
    }
}
