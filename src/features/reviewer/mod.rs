//! Reviewer dashboard: department-scoped statistics, filters and CSV export.
//!
//! Every read starts from the reviewer's [`ReviewScope`](models::ReviewScope);
//! search, date and department filters only narrow that set.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/reviewer/stats` | Reviewer | Total, unique and today counts |
//! | GET | `/api/reviewer/records` | Reviewer | Filtered records, newest first |
//! | GET | `/api/reviewer/export` | Reviewer | Filtered records as CSV |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReviewService;
