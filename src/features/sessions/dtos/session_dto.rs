use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::attendance::{
    models::{CohortYear, ProgramLevel},
    Department,
};
use crate::features::sessions::model::{SessionContext, SessionRole};
use crate::shared::validation::MEMBER_ID_REGEX;

const FILL_ALL_FIELDS: &str = "Please fill all fields!";
const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match!";
const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters!";
const MIN_PASSWORD_LEN: usize = 6;

/// Registration form checks, in the order the form reports them
fn check_registration(
    text_fields: &[&str],
    password: &str,
    confirm_password: &str,
) -> Result<(), AppError> {
    if text_fields.iter().any(|f| f.trim().is_empty())
        || password.is_empty()
        || confirm_password.is_empty()
    {
        return Err(AppError::Validation(FILL_ALL_FIELDS.to_string()));
    }
    if password != confirm_password {
        return Err(AppError::Validation(PASSWORDS_DO_NOT_MATCH.to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(PASSWORD_TOO_SHORT.to_string()));
    }
    Ok(())
}

/// Request DTO for claimant registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClaimantDto {
    pub name: String,

    #[validate(regex(path = *MEMBER_ID_REGEX, message = "Invalid student ID"))]
    #[schema(example = "22BCA017")]
    pub subject_id: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
    pub confirm_password: String,
    pub cohort_year: CohortYear,
    pub program_level: ProgramLevel,
    pub department: Department,
}

impl RegisterClaimantDto {
    pub fn check(&self) -> Result<(), AppError> {
        check_registration(
            &[&self.name, &self.subject_id, &self.email],
            &self.password,
            &self.confirm_password,
        )?;
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))
    }
}

/// Request DTO for reviewer registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReviewerDto {
    pub name: String,

    #[validate(regex(path = *MEMBER_ID_REGEX, message = "Invalid teacher ID"))]
    #[schema(example = "TCH004")]
    pub reviewer_id: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
    pub confirm_password: String,
    pub department: Department,
}

impl RegisterReviewerDto {
    pub fn check(&self) -> Result<(), AppError> {
        check_registration(
            &[&self.name, &self.reviewer_id, &self.email],
            &self.password,
            &self.confirm_password,
        )?;
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))
    }
}

/// Request DTO for claimant or reviewer login
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginDto {
    #[validate(length(min = 1, message = "Please fill all fields!"))]
    pub email: String,

    #[validate(length(min = 1, message = "Please fill all fields!"))]
    pub password: String,
}

impl LoginDto {
    /// Display name of a demo login: the local part of the email
    pub fn display_name(&self) -> String {
        self.email
            .split('@')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

/// Response DTO for the profile bound to a session
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfileDto {
    pub role: SessionRole,
    pub name: String,
    pub email: String,
    /// Subject id for claimants, reviewer id for reviewers
    pub member_id: String,
    pub department: Department,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohort_year: Option<CohortYear>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_level: Option<ProgramLevel>,
}

impl From<&SessionContext> for SessionProfileDto {
    fn from(session: &SessionContext) -> Self {
        let role = session.role();
        match session {
            SessionContext::Claimant(s) => Self {
                role,
                name: s.profile.name.clone(),
                email: s.email.clone(),
                member_id: s.profile.subject_id.clone(),
                department: s.profile.department,
                cohort_year: Some(s.profile.cohort_year),
                program_level: Some(s.profile.program_level),
            },
            SessionContext::Reviewer(s) => Self {
                role,
                name: s.profile.name.clone(),
                email: s.email.clone(),
                member_id: s.profile.reviewer_id.clone(),
                department: s.profile.department,
                cohort_year: None,
                program_level: None,
            },
        }
    }
}

/// Response DTO for login/register
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponseDto {
    /// Session token, presented as `Authorization: Bearer <token>`
    pub access_token: Uuid,
    /// Token type (always "Bearer")
    pub token_type: String,
    pub profile: SessionProfileDto,
}

impl From<&SessionContext> for SessionResponseDto {
    fn from(session: &SessionContext) -> Self {
        Self {
            access_token: session.token(),
            token_type: "Bearer".to_string(),
            profile: SessionProfileDto::from(session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claimant_dto() -> RegisterClaimantDto {
        RegisterClaimantDto {
            name: "Anitha R".to_string(),
            subject_id: "22BCA017".to_string(),
            email: "anitha@college.edu".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            cohort_year: CohortYear::II,
            program_level: ProgramLevel::UG,
            department: Department::Bca,
        }
    }

    fn message(result: Result<(), AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(claimant_dto().check().is_ok());
    }

    #[test]
    fn test_empty_field_reported_first() {
        let mut dto = claimant_dto();
        dto.name = "  ".to_string();
        dto.confirm_password = "different".to_string();
        assert_eq!(message(dto.check()), "Please fill all fields!");
    }

    #[test]
    fn test_password_mismatch() {
        let mut dto = claimant_dto();
        dto.confirm_password = "secret2".to_string();
        assert_eq!(message(dto.check()), "Passwords do not match!");
    }

    #[test]
    fn test_short_password() {
        let mut dto = claimant_dto();
        dto.password = "abc".to_string();
        dto.confirm_password = "abc".to_string();
        assert_eq!(
            message(dto.check()),
            "Password must be at least 6 characters!"
        );
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut dto = claimant_dto();
        dto.email = "not-an-email".to_string();
        assert!(message(dto.check()).contains("Invalid email format"));
    }

    #[test]
    fn test_free_form_member_id_accepted() {
        let mut dto = claimant_dto();
        dto.subject_id = "Roll No. 17/B".to_string();
        assert!(dto.check().is_ok());
    }

    #[test]
    fn test_reviewer_id_rejects_control_characters() {
        let dto = RegisterReviewerDto {
            name: "Priya".to_string(),
            reviewer_id: "tch\n04".to_string(),
            email: "priya@college.edu".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            department: Department::Mca,
        };
        assert!(message(dto.check()).contains("Invalid teacher ID"));
    }

    #[test]
    fn test_login_display_name_is_email_local_part() {
        let dto = LoginDto {
            email: "ravi.k@college.edu".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(dto.display_name(), "ravi.k");
    }
}
