//! Operational state of a station, for map markers.

use serde::Serialize;

use crate::aggregate::StationRecord;
use crate::domain::StationId;

/// Whether a station can currently be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StationState {
    Operational,
    OutOfService,
}

impl StationState {
    /// Operational iff installed and renting. Every other combination,
    /// including an unreported flag, is out of service.
    pub fn from_flags(is_installed: Option<bool>, is_renting: Option<bool>) -> Self {
        match (is_installed, is_renting) {
            (Some(true), Some(true)) => StationState::Operational,
            _ => StationState::OutOfService,
        }
    }
}

pub fn classify(station: &StationRecord) -> StationState {
    StationState::from_flags(station.is_installed, station.is_renting)
}

/// A station positioned for the map layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub station_id: StationId,
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub state: StationState,
}

/// Markers for every station with coordinates. Stations without a position
/// cannot be drawn and are left out.
pub fn markers(stations: &[StationRecord]) -> Vec<MapMarker> {
    stations
        .iter()
        .filter_map(|s| {
            Some(MapMarker {
                station_id: s.station_id.clone(),
                name: s.name.clone(),
                lat: s.lat?,
                lon: s.lon?,
                state: classify(s),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CategoryCounts;

    fn station(id: &str, installed: Option<bool>, renting: Option<bool>) -> StationRecord {
        StationRecord {
            station_id: StationId::new(id).unwrap(),
            name: Some(format!("Station {id}")),
            short_name: None,
            lat: Some(41.88),
            lon: Some(-87.63),
            capacity: Some(15),
            region_id: None,
            address: None,
            is_installed: installed,
            is_returning: Some(true),
            is_renting: renting,
            num_docks_available: Some(3),
            available: CategoryCounts::default(),
            last_reported: None,
        }
    }

    #[test]
    fn truth_table() {
        use StationState::{Operational, OutOfService};

        let cases = [
            (Some(true), Some(true), Operational),
            (Some(true), Some(false), OutOfService),
            (Some(false), Some(true), OutOfService),
            (Some(false), Some(false), OutOfService),
            (None, Some(true), OutOfService),
            (Some(true), None, OutOfService),
            (None, None, OutOfService),
        ];

        for (installed, renting, expected) in cases {
            assert_eq!(
                classify(&station("S", installed, renting)),
                expected,
                "installed={installed:?} renting={renting:?}"
            );
        }
    }

    #[test]
    fn markers_skip_stations_without_position() {
        let mut nowhere = station("S2", Some(true), Some(true));
        nowhere.lat = None;

        let stations = vec![station("S1", Some(true), Some(false)), nowhere];
        let placed = markers(&stations);

        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].station_id.as_str(), "S1");
        assert_eq!(placed[0].state, StationState::OutOfService);
    }

    #[test]
    fn state_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&StationState::OutOfService).unwrap(),
            "\"out_of_service\""
        );
    }
}
