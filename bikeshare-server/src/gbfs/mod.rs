//! GBFS feed access.
//!
//! A GBFS system publishes a root `gbfs.json` directory listing, per
//! language, the URLs of its sub-feeds. Every document wraps its content in
//! a `data` envelope. This module fetches those documents:
//! - `GbfsClient` over HTTP, with bounded retries and a per-request timeout
//! - `MockFeedSource` from memory, for tests and offline runs
//!
//! Both implement [`FeedSource`], which is all the pipeline depends on.

mod client;
mod error;
pub mod mock;
mod types;

pub use client::{FeedSource, FetchConfig, GbfsClient, RetryPolicy};
pub use error::{FetchCause, FetchError};
pub use mock::{MockFeedSource, MockResponse};
pub use types::{FeedDirectory, FeedEntry, FeedName, LanguageFeeds};
