use crate::core::error::AppError;
use crate::features::checkin::models::CheckInPhase;

/// Failures of a single check-in step.
///
/// Only `VerificationFailed` and `FrameUnavailable` leave the attempt open for
/// another capture. `Cancelled` ends the attempt without a record; everything
/// else requires a fresh attempt.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckInError {
    #[error("Location error: {0}")]
    LocationUnavailable(String),

    #[error("You are outside campus! Distance: {distance_m:.0}m")]
    OutOfGeofence { distance_m: f64, radius_m: f64 },

    #[error("Camera access denied. Please allow permissions.")]
    DeviceAccessDenied(String),

    #[error("Face not recognized. Try again.")]
    VerificationFailed { failed_captures: u32 },

    #[error("No frame available from the camera. Try again.")]
    FrameUnavailable,

    #[error("Check-in was cancelled")]
    Cancelled,

    #[error("Check-in attempt is {phase}, cannot {action}")]
    InvalidAttemptState {
        phase: CheckInPhase,
        action: &'static str,
    },
}

impl From<CheckInError> for AppError {
    fn from(e: CheckInError) -> Self {
        match e {
            CheckInError::DeviceAccessDenied(_) => AppError::Forbidden(e.to_string()),
            CheckInError::InvalidAttemptState { .. } | CheckInError::Cancelled => {
                AppError::Conflict(e.to_string())
            }
            CheckInError::LocationUnavailable(_)
            | CheckInError::OutOfGeofence { .. }
            | CheckInError::VerificationFailed { .. }
            | CheckInError::FrameUnavailable => AppError::Unprocessable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_geofence_message_rounds_distance() {
        let e = CheckInError::OutOfGeofence {
            distance_m: 1234.4,
            radius_m: 200.0,
        };
        assert_eq!(e.to_string(), "You are outside campus! Distance: 1234m");
    }

    #[test]
    fn test_app_error_mapping() {
        assert!(matches!(
            AppError::from(CheckInError::InvalidAttemptState {
                phase: CheckInPhase::Processing,
                action: "start a new attempt",
            }),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(CheckInError::Cancelled),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(CheckInError::DeviceAccessDenied("denied".into())),
            AppError::Forbidden(_)
        ));
        assert!(matches!(
            AppError::from(CheckInError::VerificationFailed { failed_captures: 2 }),
            AppError::Unprocessable(_)
        ));
    }
}
