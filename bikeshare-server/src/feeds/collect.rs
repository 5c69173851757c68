//! Sub-feed collection.

use std::collections::BTreeMap;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::gbfs::{FeedEntry, FeedSource};
use crate::warning::Warning;

/// Collection was cancelled before every feed was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("feed collection cancelled")]
pub struct Cancelled;

/// Unwrapped sub-feed payloads, by feed name.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    /// The content of each feed's `data` envelope.
    pub payloads: BTreeMap<String, Value>,
    /// Feeds that were skipped, and why.
    pub warnings: Vec<Warning>,
}

impl Collected {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.payloads.get(name)
    }
}

/// Fetch every listed feed, one after another, and unwrap its envelope.
///
/// A feed that cannot be fetched or has no `data` key is left out of the
/// result with a warning. The token is checked before each fetch and raced
/// against it, so a hung feed cannot block cancellation.
pub async fn collect<S: FeedSource>(
    source: &S,
    feeds: &[FeedEntry],
    cancel: &CancellationToken,
) -> Result<Collected, Cancelled> {
    let mut collected = Collected::default();

    for feed in feeds {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Cancelled),
            fetched = source.fetch(&feed.url) => fetched,
        };

        let document = match fetched {
            Ok(document) => document,
            Err(e) => {
                warn!(feed = %feed.name, error = %e, "skipping feed that could not be fetched");
                collected.warnings.push(Warning::FeedFetchFailed {
                    feed: feed.name.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        match unwrap_envelope(document) {
            Some(data) => {
                debug!(feed = %feed.name, "collected feed");
                collected.payloads.insert(feed.name.clone(), data);
            }
            None => {
                warn!(feed = %feed.name, "feed has no data envelope");
                collected.warnings.push(Warning::MissingDataEnvelope {
                    feed: feed.name.clone(),
                });
            }
        }
    }

    Ok(collected)
}

/// Take the `data` member out of a feed document.
fn unwrap_envelope(document: Value) -> Option<Value> {
    match document {
        Value::Object(mut map) => map.remove("data"),
        _ => None,
    }
}
