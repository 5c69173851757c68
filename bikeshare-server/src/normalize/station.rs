//! Station information and station status records.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{StationId, VehicleTypeId};

use super::fields::Fields;

/// One row of `station_information`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationInformation {
    pub station_id: StationId,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub capacity: Option<u32>,
    pub region_id: Option<String>,
    pub address: Option<String>,
}

impl StationInformation {
    pub(crate) fn read(fields: Fields<'_>) -> Result<Self, String> {
        Ok(Self {
            station_id: fields.station_id()?,
            name: fields.string("name"),
            short_name: fields.string("short_name"),
            lat: fields.f64("lat"),
            lon: fields.f64("lon"),
            capacity: fields.u32("capacity"),
            region_id: fields.string("region_id"),
            address: fields.string("address"),
        })
    }
}

/// Per-station scalar fields of `station_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStatus {
    pub station_id: StationId,
    pub num_bikes_available: Option<u32>,
    pub num_ebikes_available: Option<u32>,
    pub num_scooters_available: Option<u32>,
    pub num_scooters_unavailable: Option<u32>,
    pub num_bikes_disabled: Option<u32>,
    pub num_docks_available: Option<u32>,
    pub num_docks_disabled: Option<u32>,
    pub is_installed: Option<bool>,
    pub is_renting: Option<bool>,
    pub is_returning: Option<bool>,
    /// Epoch seconds.
    pub last_reported: Option<i64>,
}

/// A vehicle count for one station and vehicle type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleCount {
    pub station_id: StationId,
    /// `None` when the feed's ID could not be read as an integer.
    pub vehicle_type_id: Option<VehicleTypeId>,
    /// A missing count is read as zero.
    pub count: u32,
}

/// One exploded `station_status` row: a vehicle count carrying the station
/// scalars it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub count: VehicleCount,
    pub status: StationStatus,
}

/// Normalized `station_status`.
///
/// `stations` has one entry per input record, duplicates included, so a
/// station with an empty `vehicle_types_available` is still present even
/// though it contributes nothing to `rows`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusTable {
    pub stations: Vec<StationStatus>,
    pub rows: Vec<StatusRow>,
}

impl StatusTable {
    /// The `{station_id, vehicle_type_id, count}` projection of `rows`.
    pub fn counts(&self) -> impl Iterator<Item = &VehicleCount> {
        self.rows.iter().map(|row| &row.count)
    }

    pub(crate) fn push(&mut self, status: StationStatus, counts: Vec<VehicleCount>) {
        self.rows.extend(counts.into_iter().map(|count| StatusRow {
            count,
            status: status.clone(),
        }));
        self.stations.push(status);
    }
}

/// Read one `station_status` record into its scalars and its counts.
///
/// A malformed `vehicle_types_available` element is skipped and described
/// in `issues`; the station itself is kept.
pub(crate) fn read_status(
    fields: Fields<'_>,
    issues: &mut Vec<String>,
) -> Result<(StationStatus, Vec<VehicleCount>), String> {
    let station_id = fields.station_id()?;

    let entries = fields.nested("vehicle_types_available").unwrap_or_else(|reason| {
        issues.push(reason);
        &[][..]
    });

    let mut counts = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        match read_count(&station_id, entry) {
            Ok(count) => counts.push(count),
            Err(reason) => issues.push(format!("vehicle_types_available[{i}]{reason}")),
        }
    }

    let status = StationStatus {
        station_id,
        num_bikes_available: fields.u32("num_bikes_available"),
        num_ebikes_available: fields.u32("num_ebikes_available"),
        num_scooters_available: fields.u32("num_scooters_available"),
        num_scooters_unavailable: fields.u32("num_scooters_unavailable"),
        num_bikes_disabled: fields.u32("num_bikes_disabled"),
        num_docks_available: fields.u32("num_docks_available"),
        num_docks_disabled: fields.u32("num_docks_disabled"),
        is_installed: fields.flag("is_installed"),
        is_renting: fields.flag("is_renting"),
        is_returning: fields.flag("is_returning"),
        last_reported: fields.i64("last_reported"),
    };

    Ok((status, counts))
}

/// Read one count element. The error is a suffix for the element's path.
fn read_count(station_id: &StationId, entry: &Value) -> Result<VehicleCount, String> {
    let fields = Fields::new(entry).ok_or_else(|| " is not an object".to_string())?;

    // Absent means zero; present but unreadable is rejected.
    let count = match fields.get("count") {
        None => 0,
        Some(raw) => fields
            .u32("count")
            .ok_or_else(|| format!(".count {raw} is not a non-negative integer"))?,
    };

    Ok(VehicleCount {
        station_id: station_id.clone(),
        vehicle_type_id: fields.vehicle_type_id(),
        count,
    })
}
