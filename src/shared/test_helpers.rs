#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::{Arc, Mutex};

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};
#[cfg(test)]
use fake::{faker::name::en::Name, Fake};
#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
use crate::core::config::{CaptureConfig, GeofenceConfig, LocationConfig};
#[cfg(test)]
use crate::features::attendance::models::{AttendanceStatus, CohortYear, ProgramLevel};
#[cfg(test)]
use crate::features::attendance::{AttendanceLedger, AttendanceRecord, Department, SubjectProfile};
#[cfg(test)]
use crate::features::checkin::providers::{
    CameraFacing, CaptureDevice, DeviceError, FaceVerifier, Frame, FrameRelay, StreamId,
    StreamRequest,
};
#[cfg(test)]
use crate::features::checkin::{CheckInContext, CheckInService};
#[cfg(test)]
use crate::features::geofence::{Coordinate, GeofenceService};
#[cfg(test)]
use crate::features::sessions::SessionContext;

/// Geofence anchor used by every test context (200 m radius)
#[cfg(test)]
pub const CAMPUS: Coordinate = Coordinate {
    latitude: 10.997201,
    longitude: 76.837499,
};

#[cfg(test)]
pub fn sample_profile() -> SubjectProfile {
    SubjectProfile {
        name: Name().fake(),
        subject_id: "22BCA017".to_string(),
        cohort_year: CohortYear::II,
        program_level: ProgramLevel::UG,
        department: Department::Bca,
    }
}

#[cfg(test)]
pub fn sample_record(department: Department, subject_id: &str, date: &str) -> AttendanceRecord {
    AttendanceRecord {
        id: Uuid::now_v7(),
        subject_name: Name().fake(),
        subject_id: subject_id.to_string(),
        cohort_year: CohortYear::II,
        program_level: ProgramLevel::UG,
        department,
        date: date.to_string(),
        time: "9:05:42 AM".to_string(),
        status: AttendanceStatus::Present,
        latitude: "10.997201".to_string(),
        longitude: "76.837499".to_string(),
    }
}

#[cfg(test)]
pub fn jpeg_frame() -> Frame {
    Frame {
        content_type: "image/jpeg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}

/// Verifier that replays a fixed sequence of outcomes, then repeats `fallback`
#[cfg(test)]
pub struct ScriptedVerifier {
    outcomes: Mutex<VecDeque<bool>>,
    fallback: bool,
    calls: AtomicUsize,
}

#[cfg(test)]
impl ScriptedVerifier {
    pub fn new(outcomes: impl IntoIterator<Item = bool>) -> Self {
        let outcomes: VecDeque<bool> = outcomes.into_iter().collect();
        let fallback = outcomes.back().copied().unwrap_or(true);
        Self {
            outcomes: Mutex::new(outcomes),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(outcome: bool) -> Self {
        Self::new([outcome])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl FaceVerifier for ScriptedVerifier {
    async fn verify(&self, _frame: &Frame) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback)
    }
}

/// Capture device that counts stream opens and closes, backed by a frame relay
#[cfg(test)]
pub struct RecordingCamera {
    pub relay: Arc<FrameRelay>,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

#[cfg(test)]
impl RecordingCamera {
    pub fn new() -> Self {
        Self {
            relay: Arc::new(FrameRelay::new()),
            opened: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl CaptureDevice for RecordingCamera {
    async fn open_stream(&self, _request: &StreamRequest) -> Result<StreamId, DeviceError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(self.relay.open())
    }

    fn close_stream(&self, id: StreamId) {
        self.closed.fetch_add(1, Ordering::SeqCst);
        self.relay.close(id);
    }

    fn capture_frame(&self, id: StreamId) -> Result<Frame, DeviceError> {
        self.relay.latest_frame(id)
    }

    fn is_active(&self, id: StreamId) -> bool {
        self.relay.is_open(id)
    }
}

/// Check-in collaborators around [`CAMPUS`], with a fresh ledger
#[cfg(test)]
pub fn checkin_context(
    verifier: Arc<dyn FaceVerifier>,
) -> (CheckInContext, Arc<AttendanceLedger>) {
    let geofence = GeofenceConfig::new(CAMPUS.latitude, CAMPUS.longitude, 200.0).unwrap();
    let location = LocationConfig {
        high_accuracy: true,
        timeout: std::time::Duration::from_millis(10_000),
        max_cache_age: std::time::Duration::ZERO,
    };
    let capture = CaptureConfig {
        facing: CameraFacing::User,
        width: 640,
        height: 480,
    };
    let ledger = Arc::new(AttendanceLedger::new());

    let context = CheckInContext {
        geofence: Arc::new(GeofenceService::new(&geofence)),
        verifier,
        ledger: Arc::clone(&ledger),
        location_request: (&location).into(),
        stream_request: (&capture).into(),
    };
    (context, ledger)
}

#[cfg(test)]
pub fn checkin_service(
    verifier: Arc<dyn FaceVerifier>,
) -> (Arc<CheckInService>, Arc<AttendanceLedger>) {
    let (context, ledger) = checkin_context(verifier);
    (
        Arc::new(CheckInService::new(context, Arc::new(FrameRelay::new()))),
        ledger,
    )
}

/// Inject a fixed session, bypassing the bearer-token middleware
#[cfg(test)]
pub fn with_session(router: Router, session: SessionContext) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let session = session.clone();
            async move {
                request.extensions_mut().insert(session);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}
