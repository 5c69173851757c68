//! Vehicle type and free-floating bike records.

use serde::Serialize;

use crate::domain::{StationId, VehicleCategory, VehicleTypeId};

use super::fields::Fields;

/// One row of `vehicle_types`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleType {
    pub vehicle_type_id: VehicleTypeId,
    pub category: VehicleCategory,
    pub form_factor: Option<String>,
    pub propulsion_type: Option<String>,
    pub name: Option<String>,
    pub max_range_meters: Option<f64>,
}

impl VehicleType {
    /// A type without a usable ID can never be joined, so it is rejected.
    pub(crate) fn read(fields: Fields<'_>) -> Result<Self, String> {
        let vehicle_type_id = fields
            .vehicle_type_id()
            .ok_or_else(|| "vehicle_type_id is missing or not an integer".to_string())?;

        Ok(Self {
            vehicle_type_id,
            category: VehicleCategory::from_type_id(vehicle_type_id),
            form_factor: fields.string("form_factor"),
            propulsion_type: fields.string("propulsion_type"),
            name: fields.string("name"),
            max_range_meters: fields.f64("max_range_meters"),
        })
    }
}

/// One row of `free_bike_status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreeBike {
    pub bike_id: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub is_reserved: Option<bool>,
    pub is_disabled: Option<bool>,
    pub vehicle_type_id: Option<VehicleTypeId>,
    pub current_range_meters: Option<f64>,
    pub station_id: Option<StationId>,
    pub last_reported: Option<i64>,
}

impl FreeBike {
    pub(crate) fn read(fields: Fields<'_>) -> Result<Self, String> {
        let bike_id = fields
            .string("bike_id")
            .ok_or_else(|| "missing bike_id".to_string())?;

        Ok(Self {
            bike_id,
            lat: fields.f64("lat"),
            lon: fields.f64("lon"),
            is_reserved: fields.flag("is_reserved"),
            is_disabled: fields.flag("is_disabled"),
            vehicle_type_id: fields.vehicle_type_id(),
            current_range_meters: fields.f64("current_range_meters"),
            station_id: fields.station_id().ok(),
            last_reported: fields.i64("last_reported"),
        })
    }
}
