mod checkin_machine;
mod checkin_service;

pub use checkin_machine::{CancelSignal, CheckInContext, CheckInMachine};
pub use checkin_service::{CheckInHandle, CheckInService};
