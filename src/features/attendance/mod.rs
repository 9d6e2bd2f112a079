//! Attendance ledger: the append-only store of committed check-ins.
//!
//! Records are appended only by a successful check-in commit and are never
//! updated or removed. Claimants read their own history here; reviewers read
//! through the reviewer feature's scoped queries.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/attendance/me` | Claimant | Own attendance history, newest first |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use models::{AttendanceRecord, Department, SubjectProfile};
pub use services::AttendanceLedger;
