use crate::core::config::GeofenceConfig;
use crate::features::geofence::models::{Coordinate, GeofenceVerdict};

/// Earth's radius in meters (for Haversine formula)
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h marginally outside [0, 1] for near-antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Measures coordinates against the deployment's geofence
pub struct GeofenceService {
    anchor: Coordinate,
    radius_meters: f64,
}

impl GeofenceService {
    pub fn new(config: &GeofenceConfig) -> Self {
        Self {
            anchor: Coordinate::new(config.anchor_latitude, config.anchor_longitude),
            radius_meters: config.radius_meters,
        }
    }

    pub fn anchor(&self) -> Coordinate {
        self.anchor
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    /// Measure a coordinate against the anchor
    pub fn evaluate(&self, coordinate: Coordinate) -> GeofenceVerdict {
        let distance_m = haversine_distance(coordinate, self.anchor);

        tracing::debug!(
            "Geofence check: {} is {:.1}m from anchor {} (radius {:.1}m)",
            coordinate,
            distance_m,
            self.anchor,
            self.radius_meters
        );

        GeofenceVerdict {
            coordinate,
            distance_m,
            radius_m: self.radius_meters,
        }
    }
}
