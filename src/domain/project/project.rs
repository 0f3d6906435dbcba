use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::ProjectStatus;
use crate::domain::error::DomainError;
use crate::domain::validation::{max_length, parse_date, required_text};

pub const NAME_MAX_LENGTH: usize = 100;
pub const DESCRIPTION_MAX_LENGTH: usize = 500;

/// Input for creating a project; dates and status are raw client strings
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub team_id: Uuid,
    pub start_date: String,
    pub end_date: Option<String>,
    pub status: Option<String>,
}

/// Partial update of a project
///
/// `end_date` distinguishes "leave as is" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub team_id: Option<Uuid>,
    pub start_date: Option<String>,
    pub end_date: Option<Option<String>>,
    pub status: Option<String>,
}

impl ProjectChanges {
    /// Parses and validates every given field
    ///
    /// Date order can only be fully checked against the stored project, so
    /// here it is checked only when both dates are given.
    pub fn validate(self) -> Result<ProjectPatch, DomainError> {
        let patch = ProjectPatch {
            name: self
                .name
                .map(|name| required_text(&name, "project name", NAME_MAX_LENGTH))
                .transpose()?,
            description: self
                .description
                .map(|d| validate_description(&d))
                .transpose()?,
            team_id: self.team_id,
            start_date: self
                .start_date
                .map(|d| parse_date(&d, "start date"))
                .transpose()?,
            end_date: self
                .end_date
                .map(|d| d.map(|d| parse_date(&d, "end date")).transpose())
                .transpose()?,
            status: self.status.map(|s| s.parse()).transpose()?,
        };
        if let (Some(start), Some(end)) = (patch.start_date, patch.end_date) {
            check_date_order(start, end)?;
        }
        Ok(patch)
    }
}

/// A validated partial update; storage writes only the fields that are `Some`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub team_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub status: Option<ProjectStatus>,
}

/// Project aggregate root
///
/// A unit of work owned by exactly one team.
///
/// # Invariants
/// - Name is trimmed, non-empty and at most 100 characters
/// - Description is non-empty and at most 500 characters
/// - End date, when present, is not before the start date
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    id: Uuid,
    name: String,
    description: String,
    team_id: Uuid,
    status: ProjectStatus,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new Project; status defaults to Pending
    ///
    /// Whether `team_id` names an existing team is checked by the caller,
    /// which has access to the team repository.
    pub fn new(input: NewProject) -> Result<Self, DomainError> {
        let name = required_text(&input.name, "project name", NAME_MAX_LENGTH)?;
        let description = validate_description(&input.description)?;
        let start_date = parse_date(&input.start_date, "start date")?;
        let end_date = input
            .end_date
            .map(|d| parse_date(&d, "end date"))
            .transpose()?;
        let status = match input.status {
            Some(status) => status.parse()?,
            None => ProjectStatus::default(),
        };
        check_date_order(start_date, end_date)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            team_id: input.team_id,
            status,
            start_date,
            end_date,
            created_at: Utc::now(),
        })
    }

    /// Applies a validated partial update
    ///
    /// Dates are checked against the merged values; on error nothing changes.
    pub fn apply(&mut self, patch: ProjectPatch) -> Result<(), DomainError> {
        check_date_order(
            patch.start_date.unwrap_or(self.start_date),
            patch.end_date.unwrap_or(self.end_date),
        )?;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(team_id) = patch.team_id {
            self.team_id = team_id;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        Ok(())
    }

    pub fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn team_id(&self) -> Uuid {
        self.team_id
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reconstructs a Project from persistence layer data
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        name: String,
        description: String,
        team_id: Uuid,
        status: ProjectStatus,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            team_id,
            status,
            start_date,
            end_date,
            created_at,
        }
    }
}

fn validate_description(description: &str) -> Result<String, DomainError> {
    if description.trim().is_empty() {
        return Err(DomainError::validation("Please add a description"));
    }
    max_length(description, "description", DESCRIPTION_MAX_LENGTH)?;
    Ok(description.to_string())
}

fn check_date_order(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> Result<(), DomainError> {
    match end {
        Some(end) if end < start => Err(DomainError::validation(
            "End date cannot be before start date",
        )),
        _ => Ok(()),
    }
}
