//! Flattening of sub-feed payloads into typed records.
//!
//! Each known feed's record array is read into flat rows. Two feeds carry a
//! nested one-to-many array that is exploded into one row per element, with
//! the parent's scalar fields carried along:
//! - `station_status.stations[].vehicle_types_available`
//! - `system_pricing_plans.plans[].per_min_pricing`
//!
//! Missing or mistyped fields become `None`. A record that cannot be read
//! at all is dropped with a [`Warning::SchemaMismatch`].

mod fields;
mod pricing;
mod station;
mod vehicle;

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::gbfs::FeedName;
use crate::warning::Warning;

use fields::Fields;

pub use pricing::{PerMinRate, PricingPlan, PricingRow, PricingTable};
pub use station::{StationInformation, StationStatus, StatusRow, StatusTable, VehicleCount};
pub use vehicle::{FreeBike, VehicleType};

/// Normalized tables, one per known feed.
///
/// A table is `None` when its feed was not collected. A collected feed
/// whose record array is missing gives an empty table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub station_information: Option<Vec<StationInformation>>,
    pub station_status: Option<StatusTable>,
    pub free_bike_status: Option<Vec<FreeBike>>,
    pub vehicle_types: Option<Vec<VehicleType>>,
    pub system_pricing_plans: Option<PricingTable>,
}

/// Output of [`normalize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub tables: Tables,
    pub warnings: Vec<Warning>,
}

/// Normalize every known feed present in `payloads`.
///
/// `payloads` maps feed names to the content of their `data` envelopes.
/// Unknown feed names are ignored.
pub fn normalize(payloads: &BTreeMap<String, Value>) -> Normalized {
    let mut out = Normalized::default();
    let warnings = &mut out.warnings;
    let tables = &mut out.tables;

    for feed in FeedName::ALL {
        let Some(payload) = payloads.get(feed.as_str()) else {
            debug!(feed = %feed, "feed not collected");
            continue;
        };

        match feed {
            FeedName::StationInformation => {
                tables.station_information = Some(read_rows(feed, payload, warnings, |f, _| {
                    StationInformation::read(f)
                }));
            }
            FeedName::StationStatus => {
                let mut table = StatusTable::default();
                for (status, counts) in read_rows(feed, payload, warnings, station::read_status)
                {
                    table.push(status, counts);
                }
                tables.station_status = Some(table);
            }
            FeedName::FreeBikeStatus => {
                tables.free_bike_status =
                    Some(read_rows(feed, payload, warnings, |f, _| FreeBike::read(f)));
            }
            FeedName::VehicleTypes => {
                tables.vehicle_types =
                    Some(read_rows(feed, payload, warnings, |f, _| VehicleType::read(f)));
            }
            FeedName::SystemPricingPlans => {
                let mut table = PricingTable::default();
                for (plan, segments) in read_rows(feed, payload, warnings, pricing::read_plan) {
                    table.push(plan, segments);
                }
                tables.system_pricing_plans = Some(table);
            }
        }
    }

    out
}

/// Read each element of the feed's record array with `read`, dropping and
/// reporting the ones it rejects.
///
/// `read` may also describe nested elements it skipped; those are reported
/// against the record's index while the record itself is kept.
fn read_rows<T>(
    feed: FeedName,
    payload: &Value,
    warnings: &mut Vec<Warning>,
    read: impl Fn(Fields<'_>, &mut Vec<String>) -> Result<T, String>,
) -> Vec<T> {
    let Some(records) = payload.get(feed.array_key()).and_then(Value::as_array) else {
        warn!(feed = %feed, key = feed.array_key(), "feed has no record array");
        warnings.push(Warning::MissingRecordArray {
            feed: feed.as_str().to_string(),
            key: feed.array_key().to_string(),
        });
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let mut issues = Vec::new();
        let result = match Fields::new(record) {
            Some(fields) => read(fields, &mut issues),
            None => Err("record is not an object".to_string()),
        };

        match result {
            Ok(row) => rows.push(row),
            Err(reason) => {
                warn!(feed = %feed, index, %reason, "dropping unreadable record");
                issues.push(reason);
            }
        }

        for reason in issues {
            debug!(feed = %feed, index, %reason, "schema mismatch");
            warnings.push(Warning::SchemaMismatch {
                feed: feed.as_str().to_string(),
                index,
                reason,
            });
        }
    }

    rows
}
