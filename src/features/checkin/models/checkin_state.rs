use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::checkin::providers::ActiveStream;
use crate::features::geofence::GeofenceVerdict;

/// Why the location step ended the attempt
#[derive(Debug, Clone, PartialEq)]
pub enum LocationRejection {
    /// Provider error or timeout
    Unavailable(String),
    /// Measured coordinate was outside the radius
    OutOfGeofence(GeofenceVerdict),
}

/// State of one claimant's check-in attempt.
///
/// The capture states own the open stream, so leaving them by any path
/// (commit, cancel, teardown) releases the device.
#[derive(Debug)]
pub enum CheckInState {
    Idle,
    LocationPending,
    LocationRejected(LocationRejection),
    LocationVerified(GeofenceVerdict),
    CapturePending {
        verified: GeofenceVerdict,
        stream: ActiveStream,
    },
    CaptureFailed {
        verified: GeofenceVerdict,
        stream: ActiveStream,
        failed_captures: u32,
    },
    Committed {
        record_id: Uuid,
    },
}

impl CheckInState {
    pub fn phase(&self) -> CheckInPhase {
        match self {
            CheckInState::Idle => CheckInPhase::Idle,
            CheckInState::LocationPending => CheckInPhase::LocationPending,
            CheckInState::LocationRejected(_) => CheckInPhase::LocationRejected,
            CheckInState::LocationVerified(_) => CheckInPhase::LocationVerified,
            CheckInState::CapturePending { .. } => CheckInPhase::CapturePending,
            CheckInState::CaptureFailed { .. } => CheckInPhase::CaptureFailed,
            CheckInState::Committed { .. } => CheckInPhase::Committed,
        }
    }

    /// The coordinate that passed the geofence, if the attempt got that far
    pub fn verified(&self) -> Option<&GeofenceVerdict> {
        match self {
            CheckInState::LocationVerified(verified)
            | CheckInState::CapturePending { verified, .. }
            | CheckInState::CaptureFailed { verified, .. } => Some(verified),
            _ => None,
        }
    }

    pub fn stream(&self) -> Option<&ActiveStream> {
        match self {
            CheckInState::CapturePending { stream, .. }
            | CheckInState::CaptureFailed { stream, .. } => Some(stream),
            _ => None,
        }
    }

    /// A new attempt may start from here
    pub fn accepts_new_attempt(&self) -> bool {
        matches!(
            self,
            CheckInState::Idle | CheckInState::LocationRejected(_) | CheckInState::Committed { .. }
        )
    }
}

/// Serializable tag of [`CheckInState`].
///
/// `Processing` is never stored; it reports an attempt whose step is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckInPhase {
    Idle,
    LocationPending,
    LocationRejected,
    LocationVerified,
    CapturePending,
    CaptureFailed,
    Committed,
    Processing,
}

impl std::fmt::Display for CheckInPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckInPhase::Idle => write!(f, "idle"),
            CheckInPhase::LocationPending => write!(f, "location_pending"),
            CheckInPhase::LocationRejected => write!(f, "location_rejected"),
            CheckInPhase::LocationVerified => write!(f, "location_verified"),
            CheckInPhase::CapturePending => write!(f, "capture_pending"),
            CheckInPhase::CaptureFailed => write!(f, "capture_failed"),
            CheckInPhase::Committed => write!(f, "committed"),
            CheckInPhase::Processing => write!(f, "processing"),
        }
    }
}
