//! Role guards over the resolved session.
//!
//! The session middleware inserts a [`SessionContext`]; these guards require it
//! to belong to a specific role.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::core::error::AppError;
use crate::features::sessions::model::{ClaimantSession, ReviewerSession, SessionContext};

fn session(parts: &Parts) -> Result<&SessionContext, AppError> {
    parts
        .extensions
        .get::<SessionContext>()
        .ok_or_else(|| AppError::Unauthorized("Session required".to_string()))
}

/// Guard for claimant-only endpoints.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireClaimant(session): RequireClaimant) { ... }
/// ```
pub struct RequireClaimant(pub Arc<ClaimantSession>);

impl<S> FromRequestParts<S> for RequireClaimant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match session(parts)? {
            SessionContext::Claimant(session) => Ok(RequireClaimant(Arc::clone(session))),
            SessionContext::Reviewer(_) => Err(AppError::Forbidden(
                "Claimant session required".to_string(),
            )),
        }
    }
}

/// Guard for reviewer-only endpoints
pub struct RequireReviewer(pub Arc<ReviewerSession>);

impl<S> FromRequestParts<S> for RequireReviewer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match session(parts)? {
            SessionContext::Reviewer(session) => Ok(RequireReviewer(Arc::clone(session))),
            SessionContext::Claimant(_) => Err(AppError::Forbidden(
                "Reviewer session required".to_string(),
            )),
        }
    }
}
