use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::checkin::models::{CheckInPhase, CheckInState, LocationRejection};
use crate::features::checkin::providers::{Frame, LocationError, ReportedLocation};
use crate::features::checkin::services::CheckInMachine;
use crate::features::geofence::Coordinate;
use crate::shared::validation::FRAME_DATA_URL_REGEX;

/// Request DTO carrying the claimant device's location answer
///
/// Either a coordinate or the error the device reported.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLocationDto {
    #[schema(example = 10.997201)]
    pub latitude: Option<f64>,
    #[schema(example = 76.837499)]
    pub longitude: Option<f64>,
    /// Reported accuracy radius in meters (informational)
    pub accuracy: Option<f64>,
    /// Positioning error message from the device, e.g. "User denied Geolocation"
    pub error: Option<String>,
    /// Device has no positioning capability
    #[serde(default)]
    pub unsupported: bool,
}

impl SubmitLocationDto {
    pub fn into_reported(self) -> Result<ReportedLocation, AppError> {
        if self.unsupported {
            return Ok(ReportedLocation::failed(LocationError::Unsupported));
        }
        if let Some(message) = self.error.filter(|m| !m.trim().is_empty()) {
            return Ok(ReportedLocation::failed(LocationError::Provider(message)));
        }
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => {
                Ok(ReportedLocation::fix(Coordinate::new(latitude, longitude)))
            }
            _ => Err(AppError::Validation(
                "latitude and longitude are required unless an error is reported".to_string(),
            )),
        }
    }
}

/// Request DTO carrying the device's camera permission answer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenCameraDto {
    pub granted: bool,
}

/// Request DTO carrying one captured frame
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptureFrameDto {
    /// Frame as a base64 data URL, e.g. `data:image/jpeg;base64,/9j/...`
    #[validate(length(min = 1, message = "Frame is required"))]
    pub frame: String,
}

impl CaptureFrameDto {
    pub fn decode(&self) -> Result<Frame, AppError> {
        let caps = FRAME_DATA_URL_REGEX
            .captures(self.frame.trim())
            .ok_or_else(|| AppError::BadRequest("Frame must be an image data URL".to_string()))?;

        let bytes = STANDARD
            .decode(&caps[2])
            .map_err(|e| AppError::BadRequest(format!("Invalid frame encoding: {}", e)))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Frame is empty".to_string()));
        }

        Ok(Frame {
            content_type: caps[1].to_string(),
            bytes,
        })
    }
}

/// Response DTO describing a claimant's current attempt
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInStatusDto {
    pub phase: CheckInPhase,
    pub radius_m: f64,
    /// Distance of the last measured coordinate, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_coordinate: Option<Coordinate>,
    pub capture_active: bool,
    pub failed_captures: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<Uuid>,
}

impl CheckInStatusDto {
    fn empty(phase: CheckInPhase, radius_m: f64) -> Self {
        Self {
            phase,
            radius_m,
            distance_m: None,
            verified_coordinate: None,
            capture_active: false,
            failed_captures: 0,
            rejection: None,
            record_id: None,
        }
    }

    pub fn processing(radius_m: f64) -> Self {
        Self::empty(CheckInPhase::Processing, radius_m)
    }

    pub fn from_machine(machine: &CheckInMachine, radius_m: f64) -> Self {
        let mut dto = Self::empty(machine.phase(), radius_m);
        dto.capture_active = machine.is_capture_active();

        if let Some(verified) = machine.state().verified() {
            dto.distance_m = Some(verified.distance_m);
            dto.verified_coordinate = Some(verified.coordinate);
        }

        match machine.state() {
            CheckInState::LocationRejected(LocationRejection::Unavailable(reason)) => {
                dto.rejection = Some(format!("Location error: {}", reason));
            }
            CheckInState::LocationRejected(LocationRejection::OutOfGeofence(verdict)) => {
                dto.distance_m = Some(verdict.distance_m);
                dto.rejection = Some(format!(
                    "You are outside campus! Distance: {:.0}m",
                    verdict.distance_m
                ));
            }
            CheckInState::CaptureFailed {
                failed_captures, ..
            } => {
                dto.failed_captures = *failed_captures;
            }
            CheckInState::Committed { record_id } => {
                dto.record_id = Some(*record_id);
            }
            _ => {}
        }

        dto
    }
}
