//! Domain types for the bikeshare snapshot.
//!
//! Identifiers read from GBFS feeds are validated or coerced here once, so
//! the joins downstream compare like with like.

mod language;
mod station;
mod vehicle;

pub use language::{InvalidLanguage, Language};
pub use station::{InvalidStationId, StationId};
pub use vehicle::{VehicleCategory, VehicleTypeId};
