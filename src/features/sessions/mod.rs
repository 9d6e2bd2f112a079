//! Claimant and reviewer sessions.
//!
//! There is no credential store. Registration binds the submitted profile to a
//! new session; login binds a demo profile. The bearer token resolves to a
//! [`SessionContext`] that owns the claimant's check-in machine or the
//! reviewer's department scope.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/sessions/claimant/register` | Public | Register a student |
//! | POST | `/api/sessions/claimant/login` | Public | Demo student login |
//! | POST | `/api/sessions/reviewer/register` | Public | Register a teacher |
//! | POST | `/api/sessions/reviewer/login` | Public | Demo teacher login |
//! | GET | `/api/sessions/me` | Session | Current profile |
//! | POST | `/api/sessions/logout` | Session | Close the session |

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use model::SessionContext;
pub use services::SessionService;
