//! End-to-end snapshot pipeline.
//!
//! directory fetch → language resolution → sub-feed collection →
//! normalization → aggregation → classification
//!
//! The pipeline holds no state between runs. Given the same directory URL,
//! language and upstream data it produces the same outcome up to its
//! timestamp, which is what makes [`crate::cache::CachedPipeline`] valid.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::aggregate::{StationRecord, aggregate};
use crate::classify::{MapMarker, markers};
use crate::domain::Language;
use crate::feeds::{Cancelled, Collected, collect, resolve_language};
use crate::gbfs::{FeedDirectory, FeedSource, FetchError};
use crate::normalize::{FreeBike, PricingTable, VehicleType, normalize};
use crate::warning::Warning;

/// Failures that leave nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// The root directory could not be fetched
    #[error("failed to load feed directory: {0}")]
    Directory(#[from] FetchError),

    /// The root directory was fetched but is not a GBFS directory
    #[error("malformed feed directory: {message}")]
    InvalidDirectory { message: String },

    /// The caller cancelled the run
    #[error("pipeline cancelled")]
    Cancelled,
}

impl From<Cancelled> for PipelineError {
    fn from(_: Cancelled) -> Self {
        PipelineError::Cancelled
    }
}

/// Everything built from one language's feeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub language: Language,
    /// When the sub-feeds were collected
    pub generated_at: DateTime<Utc>,
    pub stations: Vec<StationRecord>,
    pub markers: Vec<MapMarker>,
    pub free_bikes: Vec<FreeBike>,
    pub vehicle_types: Vec<VehicleType>,
    pub pricing: PricingTable,
    pub warnings: Vec<Warning>,
}

/// Result of a run that did not hard-fail.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The directory has no feeds for the language. Nothing was collected.
    NoLanguage { language: Language, warning: Warning },

    /// Data was collected; it may be partial, see `Snapshot::warnings`.
    Snapshot(Snapshot),
}

impl PipelineOutcome {
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            PipelineOutcome::Snapshot(snapshot) => Some(snapshot),
            PipelineOutcome::NoLanguage { .. } => None,
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        match self {
            PipelineOutcome::Snapshot(snapshot) => &snapshot.warnings,
            PipelineOutcome::NoLanguage { warning, .. } => std::slice::from_ref(warning),
        }
    }
}

/// The snapshot pipeline for one GBFS system.
#[derive(Debug)]
pub struct Pipeline<S> {
    source: S,
    directory_url: String,
}

impl<S: FeedSource> Pipeline<S> {
    pub fn new(source: S, directory_url: impl Into<String>) -> Self {
        Self {
            source,
            directory_url: directory_url.into(),
        }
    }

    /// URL of the root `gbfs.json` document.
    pub fn directory_url(&self) -> &str {
        &self.directory_url
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the pipeline for `lang`.
    ///
    /// Only a failure to obtain the root directory is an error. A missing
    /// language returns [`PipelineOutcome::NoLanguage`]; skipped feeds and
    /// dropped records are reported as warnings on the snapshot.
    pub async fn run(
        &self,
        lang: Language,
        cancel: &CancellationToken,
    ) -> Result<PipelineOutcome, PipelineError> {
        info!(url = %self.directory_url, %lang, "building snapshot");

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let document = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
            document = self.source.fetch(&self.directory_url) => document?,
        };

        let directory =
            FeedDirectory::from_value(document).map_err(|e| PipelineError::InvalidDirectory {
                message: e.to_string(),
            })?;

        let Some(feeds) = resolve_language(&directory, lang) else {
            let warning = Warning::MissingLanguage {
                language: lang,
                available: directory.languages().map(str::to_string).collect(),
            };
            warn!(%lang, "{warning}");
            return Ok(PipelineOutcome::NoLanguage {
                language: lang,
                warning,
            });
        };

        let collected = collect(&self.source, feeds, cancel).await?;
        let snapshot = build_snapshot(lang, Utc::now(), collected);

        info!(
            %lang,
            stations = snapshot.stations.len(),
            warnings = snapshot.warnings.len(),
            "snapshot built"
        );

        Ok(PipelineOutcome::Snapshot(snapshot))
    }
}

/// Turn collected payloads into a snapshot. No I/O.
pub fn build_snapshot(
    language: Language,
    generated_at: DateTime<Utc>,
    collected: Collected,
) -> Snapshot {
    let normalized = normalize(&collected.payloads);

    let mut warnings = collected.warnings;
    warnings.extend(normalized.warnings);

    let tables = normalized.tables;
    if tables.station_status.is_none() {
        warnings.push(Warning::NoStationStatus);
    }

    let stations = aggregate(&tables);
    let markers = markers(&stations);

    Snapshot {
        language,
        generated_at,
        markers,
        stations,
        free_bikes: tables.free_bike_status.unwrap_or_default(),
        vehicle_types: tables.vehicle_types.unwrap_or_default(),
        pricing: tables.system_pricing_plans.unwrap_or_default(),
        warnings,
    }
}
