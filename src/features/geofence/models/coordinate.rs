use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinate {
    /// Latitude in degrees, within [-90, 90]
    pub latitude: f64,
    /// Longitude in degrees, within [-180, 180]
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and inside their ranges
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Outcome of measuring a coordinate against the geofence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GeofenceVerdict {
    /// The coordinate that was measured
    pub coordinate: Coordinate,
    /// Great-circle distance to the anchor in meters
    pub distance_m: f64,
    /// Configured radius in meters
    pub radius_m: f64,
}

impl GeofenceVerdict {
    /// A distance exactly on the boundary counts as inside
    pub fn is_within(&self) -> bool {
        self.distance_m <= self.radius_m
    }
}
