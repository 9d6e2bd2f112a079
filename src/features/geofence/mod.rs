//! Geofence evaluation for location-gated check-in.
//!
//! Distances are great-circle distances (haversine, Earth mean radius
//! 6,371 km) between a measured coordinate and the configured anchor.

pub mod models;
pub mod services;

pub use models::{Coordinate, GeofenceVerdict};
pub use services::GeofenceService;
