//! Web layer for the bikeshare snapshot.
//!
//! Exposes station records, map markers and warnings as JSON for an
//! external dashboard.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
