//! Capabilities the check-in machine depends on but does not implement:
//! the device's location fix, its camera, and the face verifier.

mod capture;
mod location;
mod verifier;

pub use capture::{
    ActiveStream, CameraFacing, CaptureDevice, ClaimantCamera, Frame, FrameRelay, StreamId,
    StreamRequest,
};
pub use location::{acquire_location, LocationError, LocationProvider, LocationRequest, ReportedLocation};
pub use verifier::FaceVerifier;

#[cfg(test)]
pub use capture::DeviceError;
#[cfg(test)]
pub use verifier::{FixedOutcomeVerifier, SimulatedFaceVerifier};
