pub mod checkin_handler;

pub use checkin_handler::{
    __path_cancel_checkin, __path_capture_frame, __path_get_checkin_status, __path_open_camera,
    __path_submit_location, cancel_checkin, capture_frame, get_checkin_status, open_camera,
    submit_location,
};
