use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Year of study
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CohortYear {
    I,
    II,
    III,
}

impl std::fmt::Display for CohortYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CohortYear::I => write!(f, "I"),
            CohortYear::II => write!(f, "II"),
            CohortYear::III => write!(f, "III"),
        }
    }
}

/// Undergraduate or postgraduate programme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ProgramLevel {
    UG,
    PG,
}

impl std::fmt::Display for ProgramLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgramLevel::UG => write!(f, "UG"),
            ProgramLevel::PG => write!(f, "PG"),
        }
    }
}

/// Department tag. Also the reviewer's authorization scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Department {
    #[serde(rename = "BCA")]
    Bca,
    #[serde(rename = "MCA")]
    Mca,
    #[serde(rename = "B.COM")]
    BCom,
    #[serde(rename = "BBA")]
    Bba,
    #[serde(rename = "MBA")]
    Mba,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::Bca,
        Department::Mca,
        Department::BCom,
        Department::Bba,
        Department::Mba,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Bca => "BCA",
            Department::Mca => "MCA",
            Department::BCom => "B.COM",
            Department::Bba => "BBA",
            Department::Mba => "MBA",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("Unknown department: {}", s))
    }
}

/// Who a claimant is, as copied onto each of their attendance records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectProfile {
    pub name: String,
    pub subject_id: String,
    pub cohort_year: CohortYear,
    pub program_level: ProgramLevel,
    pub department: Department,
}
