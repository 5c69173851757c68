//! HTTP route handlers.
//!
//! JSON only. Rendering, language buttons and warning banners belong to
//! whatever consumes these endpoints.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::{error, warn};

use crate::domain::Language;
use crate::gbfs::FeedSource;
use crate::pipeline::{PipelineError, PipelineOutcome, Snapshot};
use crate::warning::Warning;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<S: FeedSource + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/languages", get(languages))
        .route("/stations", get(stations::<S>))
        .route("/stations/markers", get(station_markers::<S>))
        .route("/free-bikes", get(free_bikes::<S>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: Language::SUPPORTED.to_vec(),
        default: Language::default(),
    })
}

/// Per-station table.
async fn stations<S: FeedSource + 'static>(
    State(state): State<AppState<S>>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<StationsResponse>, AppError> {
    let (language, outcome) = load(&state, &query).await?;
    let (snapshot, warnings) = split(&outcome);

    Ok(Json(StationsResponse {
        language,
        stations: snapshot.map(|s| s.stations.clone()).unwrap_or_default(),
        warnings,
    }))
}

/// Classified stations with coordinates.
async fn station_markers<S: FeedSource + 'static>(
    State(state): State<AppState<S>>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<MarkersResponse>, AppError> {
    let (language, outcome) = load(&state, &query).await?;
    let (snapshot, warnings) = split(&outcome);

    Ok(Json(MarkersResponse {
        language,
        markers: snapshot.map(|s| s.markers.clone()).unwrap_or_default(),
        warnings,
    }))
}

async fn free_bikes<S: FeedSource + 'static>(
    State(state): State<AppState<S>>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<FreeBikesResponse>, AppError> {
    let (language, outcome) = load(&state, &query).await?;
    let (snapshot, warnings) = split(&outcome);

    Ok(Json(FreeBikesResponse {
        language,
        bikes: snapshot.map(|s| s.free_bikes.clone()).unwrap_or_default(),
        warnings,
    }))
}

async fn load<S: FeedSource + 'static>(
    state: &AppState<S>,
    query: &LanguageQuery,
) -> Result<(Language, Arc<PipelineOutcome>), AppError> {
    let language = query.language().map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let outcome = state.pipeline.get(language, &state.shutdown).await?;
    Ok((language, outcome))
}

fn split(outcome: &PipelineOutcome) -> (Option<&Snapshot>, Vec<Warning>) {
    (outcome.snapshot(), outcome.warnings().to_vec())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Upstream { message: String },
    Unavailable { message: String },
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Cancelled => AppError::Unavailable {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            warn!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, CachedPipeline};
    use crate::classify::StationState;
    use crate::gbfs::MockFeedSource;
    use crate::pipeline::Pipeline;
    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    const ROOT: &str = "https://gbfs.test/gbfs.json";

    fn state(source: MockFeedSource) -> AppState<MockFeedSource> {
        let pipeline = CachedPipeline::new(Pipeline::new(source, ROOT), &CacheConfig::default());
        AppState::new(pipeline, CancellationToken::new())
    }

    fn system() -> MockFeedSource {
        MockFeedSource::new()
            .with_json(
                ROOT,
                json!({"data": {"en": {"feeds": [
                    {"name": "station_information", "url": "I"},
                    {"name": "station_status", "url": "S"},
                    {"name": "free_bike_status", "url": "B"}
                ]}}}),
            )
            .with_json(
                "I",
                json!({"data": {"stations": [{"station_id": "S1", "name": "One", "lat": 1.0, "lon": 2.0}]}}),
            )
            .with_json(
                "S",
                json!({"data": {"stations": [{"station_id": "S1", "is_installed": true, "is_renting": true}]}}),
            )
            .with_json("B", json!({"data": {"bikes": [{"bike_id": "b1"}, {"bike_id": "b2"}]}}))
    }

    fn query(lang: &str) -> Query<LanguageQuery> {
        Query(LanguageQuery {
            lang: Some(lang.to_string()),
        })
    }

    #[tokio::test]
    async fn stations_endpoint_returns_records() {
        let Json(body) = stations(State(state(system())), query("en")).await.unwrap();

        assert_eq!(body.language, Language::EN);
        assert_eq!(body.stations.len(), 1);
        assert_eq!(body.stations[0].name.as_deref(), Some("One"));
        assert!(body.warnings.is_empty());
    }

    #[tokio::test]
    async fn markers_endpoint_classifies() {
        let Json(body) = station_markers(State(state(system())), query("en"))
            .await
            .unwrap();

        assert_eq!(body.markers.len(), 1);
        assert_eq!(body.markers[0].state, StationState::Operational);
    }

    #[tokio::test]
    async fn free_bikes_endpoint() {
        let Json(body) = free_bikes(State(state(system())), query("en")).await.unwrap();
        assert_eq!(body.bikes.len(), 2);
    }

    #[tokio::test]
    async fn missing_language_is_empty_with_warning() {
        let Json(body) = stations(State(state(system())), query("fr")).await.unwrap();

        assert!(body.stations.is_empty());
        assert!(matches!(
            &body.warnings[..],
            [Warning::MissingLanguage { .. }]
        ));
    }

    #[tokio::test]
    async fn invalid_language_is_bad_request() {
        let err = stations(State(state(system())), query("english"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let source = MockFeedSource::new().with_status(ROOT, 503);
        let err = stations(State(state(source)), query("en"))
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn shutdown_is_service_unavailable() {
        let app = state(system());
        app.shutdown.cancel();

        let err = stations(State(app), query("en")).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn languages_lists_supported() {
        let Json(body) = languages().await;
        assert_eq!(body.languages, vec![Language::EN, Language::FR, Language::ES]);
        assert_eq!(body.default, Language::EN);
    }

    #[tokio::test]
    async fn router_builds() {
        let _router = create_router(state(system()));
        assert_eq!(health().await, "ok");
    }
}
