use async_trait::async_trait;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::core::config::CaptureConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraFacing {
    User,
    Environment,
}

impl CameraFacing {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraFacing::User => "user",
            CameraFacing::Environment => "environment",
        }
    }
}

impl FromStr for CameraFacing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(CameraFacing::User),
            "environment" => Ok(CameraFacing::Environment),
            other => Err(format!(
                "Unknown camera facing \"{}\", expected \"user\" or \"environment\"",
                other
            )),
        }
    }
}

/// Video stream parameters requested from a capture device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRequest {
    pub facing: CameraFacing,
    pub width: u32,
    pub height: u32,
}

impl From<&CaptureConfig> for StreamRequest {
    fn from(config: &CaptureConfig) -> Self {
        Self {
            facing: config.facing,
            width: config.width,
            height: config.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(pub Uuid);

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A still image taken from a live stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("Permission to use the camera was denied")]
    AccessDenied,

    #[error("Stream {0} is not active")]
    StreamClosed(StreamId),

    #[error("Stream {0} has not produced a frame yet")]
    NoFrame(StreamId),
}

/// A camera that can be opened as a live stream
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// May wait indefinitely for the permission grant
    async fn open_stream(&self, request: &StreamRequest) -> Result<StreamId, DeviceError>;

    /// Idempotent; closing an unknown or closed stream is a no-op
    fn close_stream(&self, id: StreamId);

    fn capture_frame(&self, id: StreamId) -> Result<Frame, DeviceError>;

    fn is_active(&self, id: StreamId) -> bool;
}

/// Scoped ownership of an open stream; the stream is closed when this is dropped.
pub struct ActiveStream {
    device: Arc<dyn CaptureDevice>,
    id: StreamId,
}

impl ActiveStream {
    pub async fn open(
        device: Arc<dyn CaptureDevice>,
        request: &StreamRequest,
    ) -> Result<Self, DeviceError> {
        let id = device.open_stream(request).await?;
        tracing::debug!(
            "Opened capture stream {} ({} {}x{})",
            id,
            request.facing.as_str(),
            request.width,
            request.height
        );
        Ok(Self { device, id })
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn capture(&self) -> Result<Frame, DeviceError> {
        self.device.capture_frame(self.id)
    }

    pub fn is_active(&self) -> bool {
        self.device.is_active(self.id)
    }
}

impl Drop for ActiveStream {
    fn drop(&mut self) {
        tracing::debug!("Releasing capture stream {}", self.id);
        self.device.close_stream(self.id);
    }
}

impl std::fmt::Debug for ActiveStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveStream").field("id", &self.id).finish()
    }
}

/// Server-side buffer of the live streams opened by claimants' cameras.
///
/// Each open stream keeps only its most recent frame, pushed by the claimant's
/// device; capturing reads that frame.
pub struct FrameRelay {
    streams: Mutex<HashMap<StreamId, Option<Frame>>>,
}

impl FrameRelay {
    pub fn new() -> Self {
        Self {
            streams: Mutex::new(HashMap::new()),
        }
    }

    fn streams(&self) -> MutexGuard<'_, HashMap<StreamId, Option<Frame>>> {
        // A panic while holding the lock cannot leave the map half-updated
        self.streams
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn open(&self) -> StreamId {
        let id = StreamId(Uuid::now_v7());
        self.streams().insert(id, None);
        id
    }

    pub fn close(&self, id: StreamId) {
        self.streams().remove(&id);
    }

    /// Replace the latest frame of an open stream
    pub fn push_frame(&self, id: StreamId, frame: Frame) -> Result<(), DeviceError> {
        match self.streams().get_mut(&id) {
            Some(slot) => {
                *slot = Some(frame);
                Ok(())
            }
            None => Err(DeviceError::StreamClosed(id)),
        }
    }

    pub fn latest_frame(&self, id: StreamId) -> Result<Frame, DeviceError> {
        match self.streams().get(&id) {
            Some(Some(frame)) => Ok(frame.clone()),
            Some(None) => Err(DeviceError::NoFrame(id)),
            None => Err(DeviceError::StreamClosed(id)),
        }
    }

    pub fn is_open(&self, id: StreamId) -> bool {
        self.streams().contains_key(&id)
    }

    pub fn open_count(&self) -> usize {
        self.streams().len()
    }
}

impl Default for FrameRelay {
    fn default() -> Self {
        Self::new()
    }
}

/// A claimant's camera as seen from the server: the permission answer their
/// device gave, backed by the shared frame relay.
pub struct ClaimantCamera {
    relay: Arc<FrameRelay>,
    permission_granted: bool,
}

impl ClaimantCamera {
    pub fn new(relay: Arc<FrameRelay>, permission_granted: bool) -> Self {
        Self {
            relay,
            permission_granted,
        }
    }
}

#[async_trait]
impl CaptureDevice for ClaimantCamera {
    async fn open_stream(&self, _request: &StreamRequest) -> Result<StreamId, DeviceError> {
        if !self.permission_granted {
            return Err(DeviceError::AccessDenied);
        }
        Ok(self.relay.open())
    }

    fn close_stream(&self, id: StreamId) {
        self.relay.close(id);
    }

    fn capture_frame(&self, id: StreamId) -> Result<Frame, DeviceError> {
        self.relay.latest_frame(id)
    }

    fn is_active(&self, id: StreamId) -> bool {
        self.relay.is_open(id)
    }
}
