use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::attendance::{Department, SubjectProfile};
use crate::features::checkin::CheckInHandle;
use crate::features::reviewer::models::ReviewScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionRole {
    Claimant,
    Reviewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerProfile {
    pub name: String,
    pub reviewer_id: String,
    pub department: Department,
}

/// A logged-in claimant. Owns the claimant's check-in machine.
pub struct ClaimantSession {
    pub token: Uuid,
    pub email: String,
    pub profile: SubjectProfile,
    pub checkin: CheckInHandle,
}

/// A logged-in reviewer, bound to one department for the session lifetime
pub struct ReviewerSession {
    pub token: Uuid,
    pub email: String,
    pub profile: ReviewerProfile,
    pub scope: ReviewScope,
}

/// Session resolved from the bearer token, inserted into request extensions
#[derive(Clone)]
pub enum SessionContext {
    Claimant(Arc<ClaimantSession>),
    Reviewer(Arc<ReviewerSession>),
}

impl SessionContext {
    pub fn token(&self) -> Uuid {
        match self {
            SessionContext::Claimant(session) => session.token,
            SessionContext::Reviewer(session) => session.token,
        }
    }

    pub fn role(&self) -> SessionRole {
        match self {
            SessionContext::Claimant(_) => SessionRole::Claimant,
            SessionContext::Reviewer(_) => SessionRole::Reviewer,
        }
    }
}
