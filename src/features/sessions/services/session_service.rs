use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::attendance::models::{CohortYear, ProgramLevel};
use crate::features::attendance::{Department, SubjectProfile};
use crate::features::checkin::CheckInService;
use crate::features::reviewer::models::ReviewScope;
use crate::features::sessions::dtos::{
    LoginDto, RegisterClaimantDto, RegisterReviewerDto, SessionResponseDto,
};
use crate::features::sessions::model::{
    ClaimantSession, ReviewerProfile, ReviewerSession, SessionContext,
};
use crate::shared::constants::{DEMO_REVIEWER_ID, DEMO_SUBJECT_ID};

/// In-memory session registry.
///
/// There is no credential store: registration binds the submitted profile to a
/// new session and login binds a demo profile.
pub struct SessionService {
    sessions: RwLock<HashMap<Uuid, SessionContext>>,
    checkin: Arc<CheckInService>,
}

impl SessionService {
    pub fn new(checkin: Arc<CheckInService>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            checkin,
        }
    }

    async fn insert(&self, session: SessionContext) -> SessionResponseDto {
        let response = SessionResponseDto::from(&session);
        self.sessions.write().await.insert(session.token(), session);
        response
    }

    async fn open_claimant(&self, email: String, profile: SubjectProfile) -> SessionResponseDto {
        let token = Uuid::now_v7();
        tracing::info!(
            "Claimant session opened: subject={}, department={}",
            profile.subject_id,
            profile.department
        );
        let checkin = self.checkin.create_machine(profile.clone());
        self.insert(SessionContext::Claimant(Arc::new(ClaimantSession {
            token,
            email,
            profile,
            checkin,
        })))
        .await
    }

    async fn open_reviewer(&self, email: String, profile: ReviewerProfile) -> SessionResponseDto {
        let token = Uuid::now_v7();
        tracing::info!(
            "Reviewer session opened: reviewer={}, department={}",
            profile.reviewer_id,
            profile.department
        );
        let scope = ReviewScope::new(profile.department);
        self.insert(SessionContext::Reviewer(Arc::new(ReviewerSession {
            token,
            email,
            profile,
            scope,
        })))
        .await
    }

    pub async fn register_claimant(&self, dto: RegisterClaimantDto) -> Result<SessionResponseDto> {
        dto.check()?;
        let profile = SubjectProfile {
            name: dto.name.trim().to_string(),
            subject_id: dto.subject_id,
            cohort_year: dto.cohort_year,
            program_level: dto.program_level,
            department: dto.department,
        };
        Ok(self.open_claimant(dto.email, profile).await)
    }

    pub async fn login_claimant(&self, dto: LoginDto) -> Result<SessionResponseDto> {
        Self::check_login(&dto)?;
        let profile = SubjectProfile {
            name: dto.display_name(),
            subject_id: DEMO_SUBJECT_ID.to_string(),
            cohort_year: CohortYear::II,
            program_level: ProgramLevel::UG,
            department: Department::Bca,
        };
        Ok(self.open_claimant(dto.email, profile).await)
    }

    pub async fn register_reviewer(&self, dto: RegisterReviewerDto) -> Result<SessionResponseDto> {
        dto.check()?;
        let profile = ReviewerProfile {
            name: dto.name.trim().to_string(),
            reviewer_id: dto.reviewer_id,
            department: dto.department,
        };
        Ok(self.open_reviewer(dto.email, profile).await)
    }

    pub async fn login_reviewer(&self, dto: LoginDto) -> Result<SessionResponseDto> {
        Self::check_login(&dto)?;
        let profile = ReviewerProfile {
            name: dto.display_name(),
            reviewer_id: DEMO_REVIEWER_ID.to_string(),
            department: Department::Bca,
        };
        Ok(self.open_reviewer(dto.email, profile).await)
    }

    fn check_login(dto: &LoginDto) -> Result<()> {
        if dto.email.trim().is_empty() || dto.password.is_empty() {
            return Err(AppError::Validation("Please fill all fields!".to_string()));
        }
        Ok(())
    }

    pub async fn resolve(&self, token: Uuid) -> Option<SessionContext> {
        self.sessions.read().await.get(&token).cloned()
    }

    /// Tear the session down. A claimant's in-flight attempt is cancelled,
    /// releasing its capture stream without appending a record.
    pub async fn logout(&self, token: Uuid) -> Result<()> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&token)
            .ok_or_else(|| AppError::Unauthorized("Unknown session".to_string()))?;

        let active = self.active_sessions().await;
        match session {
            SessionContext::Claimant(claimant) => {
                let abandoned = self.checkin.cancel(&claimant.checkin).await;
                tracing::info!(
                    "Claimant session closed: subject={}, abandoned phase={}, active_sessions={}, open_streams={}",
                    claimant.profile.subject_id,
                    abandoned,
                    active,
                    self.checkin.open_streams()
                );
            }
            SessionContext::Reviewer(reviewer) => {
                tracing::info!(
                    "Reviewer session closed: reviewer={}, active_sessions={}",
                    reviewer.profile.reviewer_id,
                    active
                );
            }
        }
        Ok(())
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::checkin::models::CheckInPhase;
    use crate::features::checkin::providers::{FixedOutcomeVerifier, ReportedLocation};
    use crate::features::sessions::model::SessionRole;
    use crate::shared::test_helpers::{checkin_service, jpeg_frame, ScriptedVerifier, CAMPUS};
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;
    use std::time::Duration;

    fn login() -> LoginDto {
        LoginDto {
            email: SafeEmail().fake(),
            password: "anything".to_string(),
        }
    }

    #[tokio::test]
    async fn test_claimant_login_binds_demo_profile() {
        let (checkin, _ledger) = checkin_service(Arc::new(ScriptedVerifier::always(true)));
        let service = SessionService::new(checkin);
        let dto = login();
        let expected_name = dto.display_name();

        let response = service.login_claimant(dto).await.unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.profile.role, SessionRole::Claimant);
        assert_eq!(response.profile.name, expected_name);
        assert_eq!(response.profile.member_id, "STU001");
        assert_eq!(response.profile.department, Department::Bca);
        assert_eq!(response.profile.cohort_year, Some(CohortYear::II));
        assert!(service.resolve(response.access_token).await.is_some());
    }

    #[tokio::test]
    async fn test_reviewer_registration_binds_scope() {
        let (checkin, _ledger) = checkin_service(Arc::new(ScriptedVerifier::always(true)));
        let service = SessionService::new(checkin);

        let response = service
            .register_reviewer(RegisterReviewerDto {
                name: "Priya".to_string(),
                reviewer_id: "TCH004".to_string(),
                email: "priya@college.edu".to_string(),
                password: "secret1".to_string(),
                confirm_password: "secret1".to_string(),
                department: Department::Mca,
            })
            .await
            .unwrap();

        match service.resolve(response.access_token).await {
            Some(SessionContext::Reviewer(session)) => {
                assert_eq!(session.scope.department(), Department::Mca);
            }
            _ => panic!("expected reviewer session"),
        }
    }

    #[tokio::test]
    async fn test_empty_login_rejected() {
        let (checkin, _ledger) = checkin_service(Arc::new(ScriptedVerifier::always(true)));
        let service = SessionService::new(checkin);

        let result = service
            .login_reviewer(LoginDto {
                email: "teacher@college.edu".to_string(),
                password: String::new(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(service.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn test_logout_cancels_in_flight_attempt() {
        let (checkin, ledger) = checkin_service(Arc::new(ScriptedVerifier::always(false)));
        let service = SessionService::new(Arc::clone(&checkin));
        let token = service.login_claimant(login()).await.unwrap().access_token;

        let handle = match service.resolve(token).await {
            Some(SessionContext::Claimant(session)) => session.checkin.clone(),
            _ => panic!("expected claimant session"),
        };
        checkin
            .submit_location(&handle, ReportedLocation::fix(CAMPUS))
            .await
            .unwrap();
        checkin.open_camera(&handle, true).await.unwrap();
        checkin.capture(&handle, jpeg_frame()).await.unwrap_err();
        assert_eq!(checkin.open_streams(), 1);

        service.logout(token).await.unwrap();

        assert_eq!(checkin.open_streams(), 0);
        assert_eq!(checkin.status(&handle).phase, CheckInPhase::Idle);
        assert!(service.resolve(token).await.is_none());
        assert_eq!(ledger.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_during_verification_appends_nothing() {
        let verifier = Arc::new(FixedOutcomeVerifier::new(true, Duration::from_millis(2_000)));
        let (checkin, ledger) = checkin_service(verifier);
        let service = SessionService::new(Arc::clone(&checkin));
        let token = service.login_claimant(login()).await.unwrap().access_token;

        let handle = match service.resolve(token).await {
            Some(SessionContext::Claimant(session)) => session.checkin.clone(),
            _ => panic!("expected claimant session"),
        };
        checkin
            .submit_location(&handle, ReportedLocation::fix(CAMPUS))
            .await
            .unwrap();
        checkin.open_camera(&handle, true).await.unwrap();

        let in_flight = {
            let checkin = Arc::clone(&checkin);
            let handle = handle.clone();
            tokio::spawn(async move { checkin.capture(&handle, jpeg_frame()).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        service.logout(token).await.unwrap();

        assert!(in_flight.await.unwrap().is_err());
        assert_eq!(ledger.len().await, 0);
        assert_eq!(checkin.open_streams(), 0);
        assert!(service.resolve(token).await.is_none());

        // Well past the verification delay
        tokio::time::sleep(Duration::from_millis(5_000)).await;
        assert_eq!(ledger.len().await, 0);
    }

    #[tokio::test]
    async fn test_logout_unknown_token() {
        let (checkin, _ledger) = checkin_service(Arc::new(ScriptedVerifier::always(true)));
        let service = SessionService::new(checkin);

        let result = service.logout(Uuid::now_v7()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
