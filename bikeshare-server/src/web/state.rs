//! Application state for the web layer.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cache::CachedPipeline;

/// Shared application state.
pub struct AppState<S> {
    /// Memoized snapshot pipeline
    pub pipeline: Arc<CachedPipeline<S>>,

    /// Cancelled on shutdown; aborts in-flight pipeline runs
    pub shutdown: CancellationToken,
}

impl<S> AppState<S> {
    /// Create a new app state.
    pub fn new(pipeline: CachedPipeline<S>, shutdown: CancellationToken) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            shutdown,
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}
