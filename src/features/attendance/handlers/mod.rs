pub mod attendance_handler;

pub use attendance_handler::{__path_get_my_attendance, get_my_attendance};
