mod checkin_state;

pub use checkin_state::{CheckInPhase, CheckInState, LocationRejection};
