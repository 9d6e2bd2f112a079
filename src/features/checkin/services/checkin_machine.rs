use chrono::Local;
use std::sync::Arc;
use tokio::sync::watch;

use crate::features::attendance::{AttendanceLedger, AttendanceRecord, SubjectProfile};
use crate::features::checkin::error::CheckInError;
use crate::features::checkin::models::{CheckInPhase, CheckInState, LocationRejection};
use crate::features::checkin::providers::{
    acquire_location, ActiveStream, CaptureDevice, FaceVerifier, LocationProvider,
    LocationRequest, StreamId, StreamRequest,
};
use crate::features::geofence::{GeofenceService, GeofenceVerdict};

/// Collaborators shared by every claimant's machine
#[derive(Clone)]
pub struct CheckInContext {
    pub geofence: Arc<GeofenceService>,
    pub verifier: Arc<dyn FaceVerifier>,
    pub ledger: Arc<AttendanceLedger>,
    pub location_request: LocationRequest,
    pub stream_request: StreamRequest,
}

/// Cancellation requests for one machine, raised without holding the machine.
///
/// While any request is pending, a capture step waiting on the verifier gives
/// up before anything is appended.
#[derive(Clone)]
pub struct CancelSignal {
    pending: Arc<watch::Sender<usize>>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (pending, _) = watch::channel(0);
        Self {
            pending: Arc::new(pending),
        }
    }

    /// The request stays pending until the returned guard is dropped
    pub fn raise(&self) -> CancelRequest {
        self.pending.send_modify(|pending| *pending += 1);
        CancelRequest {
            pending: Arc::clone(&self.pending),
        }
    }

    async fn raised(&self) {
        let mut pending = self.pending.subscribe();
        let raised = pending.wait_for(|pending| *pending > 0).await.is_ok();
        if !raised {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CancelRequest {
    pending: Arc<watch::Sender<usize>>,
}

impl Drop for CancelRequest {
    fn drop(&mut self) {
        self.pending
            .send_modify(|pending| *pending = pending.saturating_sub(1));
    }
}

/// One claimant's check-in state machine.
///
/// Steps take `&mut self`, so a machine runs at most one step at a time.
/// Dropping the machine releases any open capture stream.
pub struct CheckInMachine {
    profile: SubjectProfile,
    context: CheckInContext,
    state: CheckInState,
    cancel: CancelSignal,
}

impl CheckInMachine {
    pub fn new(profile: SubjectProfile, context: CheckInContext) -> Self {
        Self {
            profile,
            context,
            state: CheckInState::Idle,
            cancel: CancelSignal::new(),
        }
    }

    /// Signal that interrupts a capture step of this machine
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    pub fn state(&self) -> &CheckInState {
        &self.state
    }

    pub fn phase(&self) -> CheckInPhase {
        self.state.phase()
    }

    pub fn is_capture_active(&self) -> bool {
        self.state.stream().is_some_and(|stream| stream.is_active())
    }

    fn invalid(&self, action: &'static str) -> CheckInError {
        CheckInError::InvalidAttemptState {
            phase: self.phase(),
            action,
        }
    }

    /// `Idle -> LocationPending -> LocationVerified | LocationRejected`
    pub async fn request_check_in(
        &mut self,
        provider: &dyn LocationProvider,
    ) -> Result<GeofenceVerdict, CheckInError> {
        if matches!(self.state, CheckInState::LocationPending) {
            // Only observable when the step that set it was dropped mid-await
            tracing::warn!(
                "Discarding abandoned location step: subject={}",
                self.profile.subject_id
            );
        } else if !self.state.accepts_new_attempt() {
            return Err(self.invalid("start a new attempt"));
        }

        tracing::info!(
            "Check-in attempt started: subject={}",
            self.profile.subject_id
        );
        self.state = CheckInState::LocationPending;

        let coordinate = match acquire_location(provider, &self.context.location_request).await {
            Ok(coordinate) => coordinate,
            Err(e) => {
                tracing::warn!(
                    "Location unavailable: subject={}, error={}",
                    self.profile.subject_id,
                    e
                );
                self.state =
                    CheckInState::LocationRejected(LocationRejection::Unavailable(e.to_string()));
                return Err(CheckInError::LocationUnavailable(e.to_string()));
            }
        };

        let verdict = self.context.geofence.evaluate(coordinate);
        if !verdict.is_within() {
            tracing::warn!(
                "Location rejected: subject={}, distance={:.1}m, radius={:.1}m",
                self.profile.subject_id,
                verdict.distance_m,
                verdict.radius_m
            );
            self.state = CheckInState::LocationRejected(LocationRejection::OutOfGeofence(verdict));
            return Err(CheckInError::OutOfGeofence {
                distance_m: verdict.distance_m,
                radius_m: verdict.radius_m,
            });
        }

        tracing::info!(
            "Location verified: subject={}, distance={:.1}m",
            self.profile.subject_id,
            verdict.distance_m
        );
        self.state = CheckInState::LocationVerified(verdict);
        Ok(verdict)
    }

    /// `LocationVerified -> CapturePending`. A refused device ends the attempt.
    pub async fn open_capture(
        &mut self,
        device: Arc<dyn CaptureDevice>,
    ) -> Result<StreamId, CheckInError> {
        let verified = match &self.state {
            CheckInState::LocationVerified(verified) => *verified,
            _ => return Err(self.invalid("activate the camera")),
        };

        match ActiveStream::open(device, &self.context.stream_request).await {
            Ok(stream) => {
                let id = stream.id();
                tracing::info!(
                    "Capture activated: subject={}, stream={}",
                    self.profile.subject_id,
                    id
                );
                self.state = CheckInState::CapturePending { verified, stream };
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(
                    "Capture device refused: subject={}, error={}",
                    self.profile.subject_id,
                    e
                );
                self.state = CheckInState::Idle;
                Err(CheckInError::DeviceAccessDenied(e.to_string()))
            }
        }
    }

    /// `CapturePending | CaptureFailed -> Committed`, or stay open for another capture.
    ///
    /// A cancel request raised while the verifier is running ends the step with
    /// `Cancelled`, leaving the state for [`CheckInMachine::cancel`] to release.
    pub async fn capture(&mut self) -> Result<AttendanceRecord, CheckInError> {
        let (verified, frame) = match (self.state.verified(), self.state.stream()) {
            (Some(verified), Some(stream)) => {
                let frame = stream.capture().map_err(|e| {
                    tracing::warn!(
                        "No frame to capture: subject={}, error={}",
                        self.profile.subject_id,
                        e
                    );
                    CheckInError::FrameUnavailable
                })?;
                (*verified, frame)
            }
            _ => return Err(self.invalid("capture")),
        };

        let accepted = tokio::select! {
            biased;
            _ = self.cancel.raised() => {
                tracing::info!(
                    "Verification abandoned: subject={}",
                    self.profile.subject_id
                );
                return Err(CheckInError::Cancelled);
            }
            accepted = self.context.verifier.verify(&frame) => accepted,
        };

        if !accepted {
            let failed_captures = self.mark_capture_failed();
            tracing::warn!(
                "Verification failed: subject={}, failed_captures={}",
                self.profile.subject_id,
                failed_captures
            );
            return Err(CheckInError::VerificationFailed { failed_captures });
        }

        let record = AttendanceRecord::present(&self.profile, verified.coordinate, &Local::now());
        self.context.ledger.append(record.clone()).await;

        // Releases the stream before the attempt is marked committed
        drop(std::mem::replace(&mut self.state, CheckInState::Idle));
        self.state = CheckInState::Committed {
            record_id: record.id,
        };

        tracing::info!(
            "Attendance committed: subject={}, record={}",
            self.profile.subject_id,
            record.id
        );
        Ok(record)
    }

    fn mark_capture_failed(&mut self) -> u32 {
        match std::mem::replace(&mut self.state, CheckInState::Idle) {
            CheckInState::CapturePending { verified, stream } => {
                self.state = CheckInState::CaptureFailed {
                    verified,
                    stream,
                    failed_captures: 1,
                };
                1
            }
            CheckInState::CaptureFailed {
                verified,
                stream,
                failed_captures,
            } => {
                let failed_captures = failed_captures + 1;
                self.state = CheckInState::CaptureFailed {
                    verified,
                    stream,
                    failed_captures,
                };
                failed_captures
            }
            other => {
                self.state = other;
                0
            }
        }
    }

    /// Abandon the attempt: release the capture stream and forget the location.
    ///
    /// Idempotent. Returns the phase that was abandoned.
    pub fn cancel(&mut self) -> CheckInPhase {
        let previous = std::mem::replace(&mut self.state, CheckInState::Idle);
        let phase = previous.phase();
        if let Some(stream) = previous.stream() {
            tracing::info!(
                "Check-in cancelled: subject={}, phase={}, releasing stream={}",
                self.profile.subject_id,
                phase,
                stream.id()
            );
        } else if phase != CheckInPhase::Idle {
            tracing::info!(
                "Check-in cancelled: subject={}, phase={}",
                self.profile.subject_id,
                phase
            );
        }
        phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::attendance::models::AttendanceStatus;
    use crate::features::checkin::providers::{
        ClaimantCamera, FixedOutcomeVerifier, Frame, FrameRelay, LocationError,
        ReportedLocation, SimulatedFaceVerifier,
    };
    use crate::features::geofence::Coordinate;
    use crate::shared::test_helpers::{
        checkin_context, jpeg_frame, sample_profile, RecordingCamera, ScriptedVerifier, CAMPUS,
    };
    use std::time::Duration;

    fn near_campus() -> Coordinate {
        Coordinate::new(10.9973456, 76.8376789)
    }

    fn far_away() -> Coordinate {
        Coordinate::new(11.016844, 76.955833)
    }

    fn camera(relay: &Arc<FrameRelay>, granted: bool) -> Arc<dyn CaptureDevice> {
        Arc::new(ClaimantCamera::new(Arc::clone(relay), granted))
    }

    fn push_frame(machine: &CheckInMachine, relay: &FrameRelay) {
        let id = machine.state().stream().unwrap().id();
        relay.push_frame(id, jpeg_frame()).unwrap();
    }

    async fn machine_at_capture(
        verifier: Arc<dyn FaceVerifier>,
    ) -> (CheckInMachine, Arc<FrameRelay>, Arc<AttendanceLedger>) {
        let (context, ledger) = checkin_context(verifier);
        let relay = Arc::new(FrameRelay::new());
        let mut machine = CheckInMachine::new(sample_profile(), context);

        machine
            .request_check_in(&ReportedLocation::fix(near_campus()))
            .await
            .unwrap();
        machine.open_capture(camera(&relay, true)).await.unwrap();
        push_frame(&machine, &relay);

        (machine, relay, ledger)
    }

    #[tokio::test]
    async fn test_outside_geofence_never_reaches_capture() {
        let (context, ledger) = checkin_context(Arc::new(ScriptedVerifier::always(true)));
        let relay = Arc::new(FrameRelay::new());
        let mut machine = CheckInMachine::new(sample_profile(), context);

        let err = machine
            .request_check_in(&ReportedLocation::fix(far_away()))
            .await
            .unwrap_err();

        match err {
            CheckInError::OutOfGeofence {
                distance_m,
                radius_m,
            } => {
                assert!(distance_m > 10_000.0);
                assert_eq!(radius_m, 200.0);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(machine.phase(), CheckInPhase::LocationRejected);

        let err = machine.open_capture(camera(&relay, true)).await.unwrap_err();
        assert!(matches!(err, CheckInError::InvalidAttemptState { .. }));
        assert_eq!(relay.open_count(), 0);
        assert_eq!(machine.phase(), CheckInPhase::LocationRejected);
        assert_eq!(ledger.len().await, 0);
    }

    #[tokio::test]
    async fn test_successful_capture_commits_exactly_one_record() {
        let (mut machine, relay, ledger) =
            machine_at_capture(Arc::new(ScriptedVerifier::always(true))).await;

        let record = machine.capture().await.unwrap();

        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.latitude, "10.997346");
        assert_eq!(record.longitude, "76.837679");
        assert_eq!(record.subject_id, sample_profile().subject_id);
        assert_eq!(ledger.snapshot().await, vec![record.clone()]);

        assert_eq!(machine.phase(), CheckInPhase::Committed);
        assert!(!machine.is_capture_active());
        assert_eq!(relay.open_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_verification_is_retryable_on_same_attempt() {
        let verifier = Arc::new(ScriptedVerifier::new([false, false, true]));
        let (mut machine, relay, ledger) = machine_at_capture(verifier).await;

        let err = machine.capture().await.unwrap_err();
        assert_eq!(err, CheckInError::VerificationFailed { failed_captures: 1 });
        assert_eq!(machine.phase(), CheckInPhase::CaptureFailed);
        assert!(machine.is_capture_active());
        assert_eq!(ledger.len().await, 0);

        let err = machine.capture().await.unwrap_err();
        assert_eq!(err, CheckInError::VerificationFailed { failed_captures: 2 });

        machine.capture().await.unwrap();
        assert_eq!(ledger.len().await, 1);
        assert_eq!(relay.open_count(), 0);
    }

    #[tokio::test]
    async fn test_new_attempt_rejected_while_in_flight() {
        let (mut machine, _relay, _ledger) =
            machine_at_capture(Arc::new(ScriptedVerifier::always(true))).await;

        let err = machine
            .request_check_in(&ReportedLocation::fix(near_campus()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CheckInError::InvalidAttemptState {
                phase: CheckInPhase::CapturePending,
                action: "start a new attempt",
            }
        );
        assert_eq!(machine.phase(), CheckInPhase::CapturePending);
        assert!(machine.is_capture_active());
    }

    #[tokio::test]
    async fn test_new_attempt_rejected_after_location_verified() {
        let (context, _ledger) = checkin_context(Arc::new(ScriptedVerifier::always(true)));
        let mut machine = CheckInMachine::new(sample_profile(), context);
        let verified = machine
            .request_check_in(&ReportedLocation::fix(CAMPUS))
            .await
            .unwrap();

        let err = machine
            .request_check_in(&ReportedLocation::fix(far_away()))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckInError::InvalidAttemptState { .. }));
        assert_eq!(machine.state().verified(), Some(&verified));
    }

    #[tokio::test]
    async fn test_cancel_at_capture_releases_stream() {
        let (mut machine, relay, ledger) =
            machine_at_capture(Arc::new(ScriptedVerifier::always(true))).await;
        let id = machine.state().stream().unwrap().id();

        assert_eq!(machine.cancel(), CheckInPhase::CapturePending);

        assert!(!machine.is_capture_active());
        assert!(!relay.is_open(id));
        assert_eq!(machine.phase(), CheckInPhase::Idle);
        assert!(machine.state().verified().is_none());
        assert_eq!(ledger.len().await, 0);

        // Idempotent
        assert_eq!(machine.cancel(), CheckInPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_request_interrupts_verification() {
        let verifier = Arc::new(FixedOutcomeVerifier::new(true, Duration::from_millis(2_000)));
        let (mut machine, relay, ledger) = machine_at_capture(verifier).await;
        let signal = machine.cancel_signal();
        let started = tokio::time::Instant::now();

        let (result, request) = tokio::join!(machine.capture(), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            signal.raise()
        });

        assert_eq!(result.unwrap_err(), CheckInError::Cancelled);
        assert!(started.elapsed() < Duration::from_millis(2_000));
        assert_eq!(ledger.len().await, 0);
        assert_eq!(machine.phase(), CheckInPhase::CapturePending);

        assert_eq!(machine.cancel(), CheckInPhase::CapturePending);
        assert_eq!(relay.open_count(), 0);
        drop(request);
    }

    #[tokio::test]
    async fn test_released_cancel_request_does_not_stop_later_captures() {
        let (mut machine, _relay, ledger) =
            machine_at_capture(Arc::new(ScriptedVerifier::always(true))).await;

        drop(machine.cancel_signal().raise());

        machine.capture().await.unwrap();
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_cancel_after_failed_capture_releases_stream() {
        let (mut machine, relay, ledger) =
            machine_at_capture(Arc::new(ScriptedVerifier::always(false))).await;
        machine.capture().await.unwrap_err();

        assert_eq!(machine.cancel(), CheckInPhase::CaptureFailed);
        assert_eq!(relay.open_count(), 0);
        assert_eq!(ledger.len().await, 0);
    }

    #[tokio::test]
    async fn test_dropping_machine_releases_stream() {
        let (machine, relay, _ledger) =
            machine_at_capture(Arc::new(ScriptedVerifier::always(true))).await;
        assert_eq!(relay.open_count(), 1);

        drop(machine);
        assert_eq!(relay.open_count(), 0);
    }

    #[tokio::test]
    async fn test_device_closed_exactly_once_across_commit_and_cancel() {
        let verifier = Arc::new(ScriptedVerifier::always(true));
        let (context, _ledger) = checkin_context(verifier.clone());
        let camera = Arc::new(RecordingCamera::new());
        let mut machine = CheckInMachine::new(sample_profile(), context);

        machine
            .request_check_in(&ReportedLocation::fix(CAMPUS))
            .await
            .unwrap();
        let id = machine.open_capture(camera.clone()).await.unwrap();
        camera.relay.push_frame(id, jpeg_frame()).unwrap();
        machine.capture().await.unwrap();
        machine.cancel();
        drop(machine);

        assert_eq!(camera.opened(), 1);
        assert_eq!(camera.closed(), 1);
        assert_eq!(verifier.calls(), 1);
    }

    #[tokio::test]
    async fn test_location_failure_aborts_attempt() {
        let (context, ledger) = checkin_context(Arc::new(ScriptedVerifier::always(true)));
        let mut machine = CheckInMachine::new(sample_profile(), context);

        let err = machine
            .request_check_in(&ReportedLocation::failed(LocationError::Provider(
                "User denied Geolocation".to_string(),
            )))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CheckInError::LocationUnavailable("User denied Geolocation".to_string())
        );
        assert_eq!(machine.phase(), CheckInPhase::LocationRejected);
        assert_eq!(ledger.len().await, 0);

        // The claimant re-initiates
        machine
            .request_check_in(&ReportedLocation::fix(near_campus()))
            .await
            .unwrap();
        assert_eq!(machine.phase(), CheckInPhase::LocationVerified);
    }

    #[tokio::test]
    async fn test_device_refusal_aborts_attempt() {
        let (context, _ledger) = checkin_context(Arc::new(ScriptedVerifier::always(true)));
        let relay = Arc::new(FrameRelay::new());
        let mut machine = CheckInMachine::new(sample_profile(), context);
        machine
            .request_check_in(&ReportedLocation::fix(near_campus()))
            .await
            .unwrap();

        let err = machine.open_capture(camera(&relay, false)).await.unwrap_err();

        assert!(matches!(err, CheckInError::DeviceAccessDenied(_)));
        assert_eq!(machine.phase(), CheckInPhase::Idle);
        assert_eq!(relay.open_count(), 0);
    }

    #[tokio::test]
    async fn test_capture_without_frame_keeps_attempt_open() {
        let (context, ledger) = checkin_context(Arc::new(ScriptedVerifier::always(true)));
        let relay = Arc::new(FrameRelay::new());
        let mut machine = CheckInMachine::new(sample_profile(), context);
        machine
            .request_check_in(&ReportedLocation::fix(near_campus()))
            .await
            .unwrap();
        machine.open_capture(camera(&relay, true)).await.unwrap();

        let err = machine.capture().await.unwrap_err();
        assert_eq!(err, CheckInError::FrameUnavailable);
        assert_eq!(machine.phase(), CheckInPhase::CapturePending);

        push_frame(&machine, &relay);
        machine.capture().await.unwrap();
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_capture_before_location_is_invalid() {
        let (context, _ledger) = checkin_context(Arc::new(ScriptedVerifier::always(true)));
        let mut machine = CheckInMachine::new(sample_profile(), context);

        let err = machine.capture().await.unwrap_err();
        assert_eq!(
            err,
            CheckInError::InvalidAttemptState {
                phase: CheckInPhase::Idle,
                action: "capture",
            }
        );
    }

    #[tokio::test]
    async fn test_committed_attempt_allows_a_fresh_one() {
        let (mut machine, relay, ledger) =
            machine_at_capture(Arc::new(ScriptedVerifier::always(true))).await;
        machine.capture().await.unwrap();

        machine
            .request_check_in(&ReportedLocation::fix(near_campus()))
            .await
            .unwrap();
        machine.open_capture(camera(&relay, true)).await.unwrap();
        push_frame(&machine, &relay);
        machine.capture().await.unwrap();

        // Same subject, same day: both kept
        assert_eq!(ledger.len().await, 2);
    }

    #[tokio::test]
    async fn test_record_uses_coordinate_that_passed_the_geofence() {
        let (mut machine, relay, ledger) =
            machine_at_capture(Arc::new(ScriptedVerifier::always(true))).await;

        // Later frames carry no location; the verified fix is what gets recorded
        let id = machine.state().stream().unwrap().id();
        relay
            .push_frame(
                id,
                Frame {
                    content_type: "image/png".to_string(),
                    bytes: vec![0x89, 0x50],
                },
            )
            .unwrap();
        machine.capture().await.unwrap();

        let record = &ledger.snapshot().await[0];
        assert_eq!(record.latitude, format!("{:.6}", near_campus().latitude));
        assert_eq!(record.longitude, format!("{:.6}", near_campus().longitude));
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_verifier_eventually_commits_once() {
        let verifier = Arc::new(SimulatedFaceVerifier::new(0.8, Duration::from_millis(2_000)));
        let (mut machine, _relay, ledger) = machine_at_capture(verifier).await;

        let mut attempts = 0;
        loop {
            attempts += 1;
            match machine.capture().await {
                Ok(_) => break,
                Err(e) => assert!(matches!(e, CheckInError::VerificationFailed { .. })),
            }
            assert!(attempts < 200, "verifier never accepted a frame");
        }

        assert_eq!(ledger.len().await, 1);
        assert_eq!(machine.phase(), CheckInPhase::Committed);
    }
}
