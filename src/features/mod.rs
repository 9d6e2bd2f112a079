pub mod attendance;
pub mod checkin;
pub mod geofence;
pub mod reviewer;
pub mod sessions;
