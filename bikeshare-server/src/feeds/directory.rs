//! Language selection in the feed directory.

use crate::domain::Language;
use crate::gbfs::{FeedDirectory, FeedEntry};

/// Look up the feed list for `lang`.
///
/// Returns `None` when the directory carries no entry for the language.
/// That is an expected outcome, not an error: the caller reports it as "no
/// data for this language" and carries on.
pub fn resolve_language(directory: &FeedDirectory, lang: Language) -> Option<&[FeedEntry]> {
    directory
        .data
        .get(lang.as_str())
        .map(|feeds| feeds.feeds.as_slice())
}
