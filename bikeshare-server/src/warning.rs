//! Soft failures surfaced alongside pipeline results.

use std::fmt;

use serde::Serialize;

use crate::domain::Language;

/// A condition that degraded the result without failing the pipeline.
///
/// Warnings are returned to the caller, never printed; the presentation
/// layer decides how to show them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The directory has no feeds for the requested language.
    MissingLanguage {
        language: Language,
        available: Vec<String>,
    },

    /// A sub-feed document had no `data` envelope and was skipped.
    MissingDataEnvelope { feed: String },

    /// A sub-feed could not be fetched and was skipped.
    FeedFetchFailed { feed: String, error: String },

    /// A known feed's envelope had no record array under the expected key.
    MissingRecordArray { feed: String, key: String },

    /// A record could not be read and was dropped.
    SchemaMismatch {
        feed: String,
        index: usize,
        reason: String,
    },

    /// `station_status` was not available, so no stations could be built.
    NoStationStatus,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingLanguage {
                language,
                available,
            } => {
                write!(f, "the feed has no data for language '{language}'")?;
                if !available.is_empty() {
                    write!(f, " (available: {})", available.join(", "))?;
                }
                Ok(())
            }
            Warning::MissingDataEnvelope { feed } => {
                write!(f, "no 'data' field found for {feed}")
            }
            Warning::FeedFetchFailed { feed, error } => {
                write!(f, "skipped {feed}: {error}")
            }
            Warning::MissingRecordArray { feed, key } => {
                write!(f, "{feed} has no '{key}' array")
            }
            Warning::SchemaMismatch {
                feed,
                index,
                reason,
            } => write!(f, "dropped {feed} record {index}: {reason}"),
            Warning::NoStationStatus => {
                write!(f, "station_status is unavailable; no stations to show")
            }
        }
    }
}
