use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Progress of a project
///
/// Any status may be set from any other; the workflow is advisory.
///
/// # Example
/// ```
/// use teamboard_api::domain::project::value_objects::ProjectStatus;
///
/// let status: ProjectStatus = "In Progress".parse().unwrap();
/// assert_eq!(status, ProjectStatus::InProgress);
/// assert_eq!(ProjectStatus::default().to_string(), "Pending");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "Pending",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ProjectStatus::Pending),
            "In Progress" => Ok(ProjectStatus::InProgress),
            "Completed" => Ok(ProjectStatus::Completed),
            other => Err(DomainError::validation(format!(
                "`{}` is not a valid project status (expected Pending, In Progress or Completed)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
