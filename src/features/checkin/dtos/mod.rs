mod checkin_dto;

pub use checkin_dto::{CaptureFrameDto, CheckInStatusDto, OpenCameraDto, SubmitLocationDto};
