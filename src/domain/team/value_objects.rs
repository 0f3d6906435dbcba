use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Whether a team is currently operating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TeamStatus {
    #[default]
    Active,
    Inactive,
}

impl TeamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamStatus::Active => "Active",
            TeamStatus::Inactive => "Inactive",
        }
    }
}

impl FromStr for TeamStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(TeamStatus::Active),
            "Inactive" => Ok(TeamStatus::Inactive),
            other => Err(DomainError::validation(format!(
                "`{}` is not a valid team status (expected Active or Inactive)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared skill level of a team
///
/// # Example
/// ```
/// use teamboard_api::domain::team::value_objects::ExpertiseLevel;
///
/// let level: ExpertiseLevel = "Expert".parse().unwrap();
/// assert_eq!(level, ExpertiseLevel::Expert);
/// assert_eq!(ExpertiseLevel::default().to_string(), "Intermediate");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExpertiseLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl ExpertiseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpertiseLevel::Beginner => "Beginner",
            ExpertiseLevel::Intermediate => "Intermediate",
            ExpertiseLevel::Advanced => "Advanced",
            ExpertiseLevel::Expert => "Expert",
        }
    }
}

impl FromStr for ExpertiseLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(ExpertiseLevel::Beginner),
            "Intermediate" => Ok(ExpertiseLevel::Intermediate),
            "Advanced" => Ok(ExpertiseLevel::Advanced),
            "Expert" => Ok(ExpertiseLevel::Expert),
            other => Err(DomainError::validation(format!(
                "`{}` is not a valid expertise level",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ExpertiseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
