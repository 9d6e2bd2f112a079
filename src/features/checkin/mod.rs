//! Check-in workflow: location gate, face capture, verification, commit.
//!
//! Every claimant session owns one [`CheckInMachine`]. An attempt moves
//! strictly through location check, capture activation and verification
//! before a record is appended to the ledger:
//!
//! ```text
//! Idle -> LocationPending -> LocationRejected
//!                         -> LocationVerified -> CapturePending -> Committed
//!                                                     ^    |
//!                                                     |    v
//!                                                 CaptureFailed
//! ```
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/checkin` | Claimant | Current attempt state |
//! | POST | `/api/checkin/location` | Claimant | Start an attempt with a device location |
//! | POST | `/api/checkin/camera` | Claimant | Activate the capture device |
//! | POST | `/api/checkin/capture` | Claimant | Submit a frame for verification |
//! | POST | `/api/checkin/cancel` | Claimant | Abandon the attempt |

pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod routes;
pub mod services;

pub use services::{CheckInContext, CheckInHandle, CheckInService};
