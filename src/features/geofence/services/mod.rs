mod geofence_service;

pub use geofence_service::GeofenceService;
