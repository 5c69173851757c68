//! Memoization of pipeline outcomes.
//!
//! The pipeline is a pure function of `(directory URL, language)` plus
//! whatever upstream currently publishes. Outcomes are cached under that key
//! with a short TTL so repeated requests within the window do not refetch
//! every sub-feed. Failures are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::Language;
use crate::gbfs::FeedSource;
use crate::pipeline::{Pipeline, PipelineError, PipelineOutcome};

/// Cache key: (directory URL, language).
type SnapshotKey = (String, Language);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 64,
        }
    }
}

/// Pipeline with memoized outcomes.
pub struct CachedPipeline<S> {
    pipeline: Pipeline<S>,
    outcomes: MokaCache<SnapshotKey, Arc<PipelineOutcome>>,
}

impl<S: FeedSource> CachedPipeline<S> {
    /// Create a new cached pipeline.
    pub fn new(pipeline: Pipeline<S>, config: &CacheConfig) -> Self {
        let outcomes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { pipeline, outcomes }
    }

    /// Get the outcome for `lang`, running the pipeline on a miss.
    pub async fn get(
        &self,
        lang: Language,
        cancel: &CancellationToken,
    ) -> Result<Arc<PipelineOutcome>, PipelineError> {
        let key = (self.pipeline.directory_url().to_string(), lang);

        // Try cache first
        if let Some(cached) = self.outcomes.get(&key).await {
            debug!(%lang, "snapshot cache hit");
            return Ok(cached);
        }

        let outcome = Arc::new(self.pipeline.run(lang, cancel).await?);
        self.outcomes.insert(key, outcome.clone()).await;

        Ok(outcome)
    }

    /// Access the underlying pipeline for runs that bypass the cache.
    pub fn pipeline(&self) -> &Pipeline<S> {
        &self.pipeline
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.outcomes.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gbfs::{MockFeedSource, MockResponse};
    use serde_json::json;

    const ROOT: &str = "https://gbfs.test/gbfs.json";

    fn source() -> MockFeedSource {
        MockFeedSource::new()
            .with_json(
                ROOT,
                json!({"data": {"en": {"feeds": [{"name": "station_status", "url": "S"}]}}}),
            )
            .with_json(
                "S",
                json!({"data": {"stations": [{"station_id": "S1", "vehicle_types_available": []}]}}),
            )
    }

    fn cached(source: MockFeedSource, config: &CacheConfig) -> CachedPipeline<MockFeedSource> {
        CachedPipeline::new(Pipeline::new(source, ROOT), config)
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_capacity, 64);
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let cache = cached(source(), &CacheConfig::default());
        let cancel = CancellationToken::new();

        let first = cache.get(Language::EN, &cancel).await.unwrap();
        let second = cache.get(Language::EN, &cancel).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.pipeline().source().total_attempts(), 2);
    }

    #[tokio::test]
    async fn languages_are_cached_separately() {
        let cache = cached(source(), &CacheConfig::default());
        let cancel = CancellationToken::new();

        let en = cache.get(Language::EN, &cancel).await.unwrap();
        let fr = cache.get(Language::FR, &cancel).await.unwrap();

        assert!(en.snapshot().is_some());
        assert!(fr.snapshot().is_none());
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let cache = cached(source(), &CacheConfig::default());
        let cancel = CancellationToken::new();

        cache.get(Language::EN, &cancel).await.unwrap();
        cache.invalidate_all();
        cache.get(Language::EN, &cancel).await.unwrap();

        assert_eq!(cache.pipeline().source().attempts(ROOT), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let source = MockFeedSource::new().with_script(
            ROOT,
            vec![
                MockResponse::Status(500),
                MockResponse::Status(500),
                MockResponse::Status(500),
                MockResponse::Status(500),
                MockResponse::Json(json!({"data": {"en": {"feeds": []}}})),
            ],
        );
        let cache = cached(source, &CacheConfig::default());
        let cancel = CancellationToken::new();

        assert!(cache.get(Language::EN, &cancel).await.is_err());
        assert!(cache.get(Language::EN, &cancel).await.is_ok());
        assert_eq!(cache.pipeline().source().attempts(ROOT), 5);
    }

    #[tokio::test]
    async fn expired_entries_are_rebuilt() {
        let config = CacheConfig::default().with_ttl(Duration::from_millis(20));
        let cache = cached(source(), &config);
        let cancel = CancellationToken::new();

        cache.get(Language::EN, &cancel).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        cache.get(Language::EN, &cancel).await.unwrap();

        assert_eq!(cache.pipeline().source().attempts(ROOT), 2);
    }
}
