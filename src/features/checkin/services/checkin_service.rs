use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::features::attendance::{AttendanceRecord, SubjectProfile};
use crate::features::checkin::dtos::CheckInStatusDto;
use crate::features::checkin::error::CheckInError;
use crate::features::checkin::models::CheckInPhase;
use crate::features::checkin::providers::{
    CaptureDevice, ClaimantCamera, Frame, FrameRelay, ReportedLocation, StreamId,
};
use crate::features::checkin::services::{CancelSignal, CheckInContext, CheckInMachine};
use crate::features::geofence::GeofenceVerdict;

/// A claimant's machine, shared between their session and in-flight requests.
///
/// The cancel signal and the committed record ids are reachable without
/// waiting for the machine.
#[derive(Clone)]
pub struct CheckInHandle {
    machine: Arc<Mutex<CheckInMachine>>,
    cancel: CancelSignal,
    committed: Arc<StdMutex<Vec<Uuid>>>,
}

impl CheckInHandle {
    fn new(machine: CheckInMachine) -> Self {
        let cancel = machine.cancel_signal();
        Self {
            machine: Arc::new(Mutex::new(machine)),
            cancel,
            committed: Arc::new(StdMutex::new(Vec::new())),
        }
    }

    /// Ids of the records committed through this handle, oldest first
    pub fn committed_records(&self) -> Vec<Uuid> {
        self.committed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record_commit(&self, id: Uuid) {
        self.committed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(id);
    }
}

/// Drives claimants' check-in machines from request handlers.
///
/// A step that finds the machine busy is rejected instead of queued, so each
/// claimant has at most one step in flight. Cancellation interrupts a capture
/// waiting on the verifier, then takes the machine.
pub struct CheckInService {
    context: CheckInContext,
    relay: Arc<FrameRelay>,
}

impl CheckInService {
    pub fn new(context: CheckInContext, relay: Arc<FrameRelay>) -> Self {
        Self { context, relay }
    }

    pub fn radius_meters(&self) -> f64 {
        self.context.geofence.radius_meters()
    }

    /// Fresh machine for a newly opened claimant session
    pub fn create_machine(&self, profile: SubjectProfile) -> CheckInHandle {
        CheckInHandle::new(CheckInMachine::new(profile, self.context.clone()))
    }

    fn acquire<'a>(
        handle: &'a CheckInHandle,
        action: &'static str,
    ) -> Result<MutexGuard<'a, CheckInMachine>, CheckInError> {
        handle
            .machine
            .try_lock()
            .map_err(|_| CheckInError::InvalidAttemptState {
                phase: CheckInPhase::Processing,
                action,
            })
    }

    pub fn status(&self, handle: &CheckInHandle) -> CheckInStatusDto {
        match handle.machine.try_lock() {
            Ok(machine) => CheckInStatusDto::from_machine(&machine, self.radius_meters()),
            Err(_) => CheckInStatusDto::processing(self.radius_meters()),
        }
    }

    pub async fn submit_location(
        &self,
        handle: &CheckInHandle,
        location: ReportedLocation,
    ) -> Result<GeofenceVerdict, CheckInError> {
        let mut machine = Self::acquire(handle, "start a new attempt")?;
        machine.request_check_in(&location).await
    }

    pub async fn open_camera(
        &self,
        handle: &CheckInHandle,
        permission_granted: bool,
    ) -> Result<StreamId, CheckInError> {
        let mut machine = Self::acquire(handle, "activate the camera")?;
        let device: Arc<dyn CaptureDevice> = Arc::new(ClaimantCamera::new(
            Arc::clone(&self.relay),
            permission_granted,
        ));
        machine.open_capture(device).await
    }

    /// Feed the frame to the open stream, then capture and verify it
    pub async fn capture(
        &self,
        handle: &CheckInHandle,
        frame: Frame,
    ) -> Result<AttendanceRecord, CheckInError> {
        let mut machine = Self::acquire(handle, "capture")?;

        let stream_id = machine
            .state()
            .stream()
            .map(|stream| stream.id())
            .ok_or(CheckInError::InvalidAttemptState {
                phase: machine.phase(),
                action: "capture",
            })?;

        self.relay.push_frame(stream_id, frame).map_err(|e| {
            tracing::warn!("Frame relay rejected frame: {}", e);
            CheckInError::FrameUnavailable
        })?;

        let record = machine.capture().await?;
        handle.record_commit(record.id);
        Ok(record)
    }

    /// Abandon the attempt. A capture waiting on the verifier is interrupted
    /// first, so nothing is appended. Returns the phase that was abandoned.
    pub async fn cancel(&self, handle: &CheckInHandle) -> CheckInPhase {
        let _request = handle.cancel.raise();
        handle.machine.lock().await.cancel()
    }

    pub fn open_streams(&self) -> usize {
        self.relay.open_count()
    }
}
