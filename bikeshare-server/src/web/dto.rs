//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::aggregate::StationRecord;
use crate::classify::MapMarker;
use crate::domain::{InvalidLanguage, Language};
use crate::normalize::FreeBike;
use crate::warning::Warning;

/// Query string carrying the selected language.
#[derive(Debug, Default, Deserialize)]
pub struct LanguageQuery {
    /// Two-letter code; defaults to English
    pub lang: Option<String>,
}

impl LanguageQuery {
    pub fn language(&self) -> Result<Language, InvalidLanguage> {
        match self.lang.as_deref().map(str::trim) {
            None | Some("") => Ok(Language::default()),
            Some(code) => Language::parse(code),
        }
    }
}

/// Station table for the dashboard.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub language: Language,
    pub stations: Vec<StationRecord>,
    pub warnings: Vec<Warning>,
}

/// Positioned, classified stations for the map.
#[derive(Debug, Serialize)]
pub struct MarkersResponse {
    pub language: Language,
    pub markers: Vec<MapMarker>,
    pub warnings: Vec<Warning>,
}

/// Dockless vehicles.
#[derive(Debug, Serialize)]
pub struct FreeBikesResponse {
    pub language: Language,
    pub bikes: Vec<FreeBike>,
    pub warnings: Vec<Warning>,
}

/// Languages the selector offers.
#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<Language>,
    pub default: Language,
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
