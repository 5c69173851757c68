//! Joining normalized feeds into one record per station.
//!
//! Status is the driving table. Vehicle counts are categorized through
//! `vehicle_types`, pivoted into a fixed set of columns, and attached to the
//! deduplicated status rows; `station_information` is then left-joined on
//! `station_id`. A station that only appears in status keeps `None` for the
//! fields information would have supplied.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{StationId, VehicleCategory, VehicleTypeId};
use crate::normalize::{StationInformation, StationStatus, Tables, VehicleCount, VehicleType};

/// Available vehicles at a station, one count per category.
///
/// Categories with no matching count row are zero. `other` is kept so the
/// categories always add up to the station's total, but it is not one of
/// the output columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    #[serde(rename = "available_Bike")]
    pub bike: u32,
    #[serde(rename = "available_E-Bike")]
    pub e_bike: u32,
    #[serde(rename = "available_E-Scooter")]
    pub e_scooter: u32,
    #[serde(skip)]
    pub other: u32,
}

impl CategoryCounts {
    pub fn get(&self, category: VehicleCategory) -> u32 {
        match category {
            VehicleCategory::Bike => self.bike,
            VehicleCategory::EBike => self.e_bike,
            VehicleCategory::EScooter => self.e_scooter,
            VehicleCategory::Other => self.other,
        }
    }

    pub fn add(&mut self, category: VehicleCategory, count: u32) {
        let slot = match category {
            VehicleCategory::Bike => &mut self.bike,
            VehicleCategory::EBike => &mut self.e_bike,
            VehicleCategory::EScooter => &mut self.e_scooter,
            VehicleCategory::Other => &mut self.other,
        };
        *slot = slot.saturating_add(count);
    }

    pub fn total(&self) -> u64 {
        VehicleCategory::ALL
            .iter()
            .map(|c| u64::from(self.get(*c)))
            .sum()
    }
}

/// The joined, per-station snapshot row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecord {
    pub station_id: StationId,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub capacity: Option<u32>,
    pub region_id: Option<String>,
    pub address: Option<String>,
    pub is_installed: Option<bool>,
    pub is_returning: Option<bool>,
    pub is_renting: Option<bool>,
    pub num_docks_available: Option<u32>,
    #[serde(flatten)]
    pub available: CategoryCounts,
    pub last_reported: Option<DateTime<Utc>>,
}

/// Build one record per station that has status data.
///
/// Returns an empty list when `station_status` was not collected. Output
/// order is the order stations first appear in `station_status`.
pub fn aggregate(tables: &Tables) -> Vec<StationRecord> {
    let Some(status) = &tables.station_status else {
        return Vec::new();
    };

    let categories = category_index(tables.vehicle_types.as_deref().unwrap_or_default());
    let mut counts = pivot(status.counts(), &categories);

    let information: HashMap<&StationId, &StationInformation> = tables
        .station_information
        .as_deref()
        .unwrap_or_default()
        .iter()
        .rev()
        .map(|info| (&info.station_id, info))
        .collect();

    dedup_status(&status.stations)
        .into_iter()
        .map(|status| {
            let available = counts.remove(&status.station_id).unwrap_or_default();
            let info = information.get(&status.station_id).copied();
            join(status, available, info)
        })
        .collect()
}

/// Map each known vehicle type to its category.
pub fn category_index(vehicle_types: &[VehicleType]) -> HashMap<VehicleTypeId, VehicleCategory> {
    vehicle_types
        .iter()
        .map(|vt| (vt.vehicle_type_id, vt.category))
        .collect()
}

/// Sum counts per station and category.
///
/// A count whose type is missing from `categories`, or whose ID could not
/// be read, is counted as `Other`.
pub fn pivot<'a>(
    counts: impl IntoIterator<Item = &'a VehicleCount>,
    categories: &HashMap<VehicleTypeId, VehicleCategory>,
) -> HashMap<StationId, CategoryCounts> {
    let mut pivoted: HashMap<StationId, CategoryCounts> = HashMap::new();

    for count in counts {
        let category = count
            .vehicle_type_id
            .and_then(|id| categories.get(&id).copied())
            .unwrap_or(VehicleCategory::Other);

        pivoted
            .entry(count.station_id.clone())
            .or_default()
            .add(category, count.count);
    }

    pivoted
}

/// Keep the first status row for each station, in input order.
pub fn dedup_status(stations: &[StationStatus]) -> Vec<&StationStatus> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for status in stations {
        if seen.insert(&status.station_id) {
            unique.push(status);
        }
    }
    unique
}

/// Convert epoch seconds to a UTC timestamp.
pub fn epoch_to_utc(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

fn join(
    status: &StationStatus,
    available: CategoryCounts,
    info: Option<&StationInformation>,
) -> StationRecord {
    StationRecord {
        station_id: status.station_id.clone(),
        name: info.and_then(|i| i.name.clone()),
        short_name: info.and_then(|i| i.short_name.clone()),
        lat: info.and_then(|i| i.lat),
        lon: info.and_then(|i| i.lon),
        capacity: info.and_then(|i| i.capacity),
        region_id: info.and_then(|i| i.region_id.clone()),
        address: info.and_then(|i| i.address.clone()),
        is_installed: status.is_installed,
        is_returning: status.is_returning,
        is_renting: status.is_renting,
        num_docks_available: status.num_docks_available,
        available,
        last_reported: status.last_reported.and_then(epoch_to_utc),
    }
}
