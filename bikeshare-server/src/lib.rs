//! Bikeshare station snapshot server.
//!
//! Reads a GBFS feed directory, fetches the station, vehicle and pricing
//! feeds for one language, and joins them into a single record per station
//! with vehicle counts by category and an operational state for the map.

pub mod aggregate;
pub mod cache;
pub mod classify;
pub mod config;
pub mod domain;
pub mod feeds;
pub mod gbfs;
pub mod normalize;
pub mod pipeline;
pub mod warning;
pub mod web;
