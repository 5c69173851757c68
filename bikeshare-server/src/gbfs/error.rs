//! Feed fetch error types.

/// Why a single fetch attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchCause {
    /// Server answered with a non-2xx status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Request never completed (DNS, connect, timeout, body read)
    #[error("transport error: {0}")]
    Transport(String),

    /// 2xx response whose body was not valid JSON
    #[error("invalid JSON: {0}")]
    Json(String),
}

impl FetchCause {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Every status and transport failure is retried, 4xx included. A body
    /// that fails to parse will parse the same way next time.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchCause::Json(_))
    }
}

impl From<reqwest::Error> for FetchCause {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchCause::Status(status.as_u16()),
            None => FetchCause::Transport(err.to_string()),
        }
    }
}

/// A feed document could not be fetched after exhausting the retry budget.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to fetch {url} after {attempts} attempt(s): {cause}")]
pub struct FetchError {
    pub url: String,
    pub attempts: u32,
    /// Cause of the last attempt.
    pub cause: FetchCause,
}

impl FetchError {
    /// HTTP status of the last attempt, if the server answered.
    pub fn last_status(&self) -> Option<u16> {
        match self.cause {
            FetchCause::Status(status) => Some(status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FetchError {
            url: "https://example.com/gbfs.json".into(),
            attempts: 4,
            cause: FetchCause::Status(503),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch https://example.com/gbfs.json after 4 attempt(s): HTTP status 503"
        );
        assert_eq!(err.last_status(), Some(503));

        let err = FetchError {
            url: "u".into(),
            attempts: 1,
            cause: FetchCause::Json("expected value".into()),
        };
        assert!(err.to_string().contains("invalid JSON: expected value"));
        assert_eq!(err.last_status(), None);
    }

    #[test]
    fn retryable_causes() {
        assert!(FetchCause::Status(503).is_retryable());
        assert!(FetchCause::Status(404).is_retryable());
        assert!(FetchCause::Transport("timed out".into()).is_retryable());
        assert!(!FetchCause::Json("eof".into()).is_retryable());
    }
}
