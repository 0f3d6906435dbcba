use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::{ExpertiseLevel, TeamStatus};
use crate::domain::error::DomainError;
use crate::domain::validation::{max_length, required_text};

pub const NAME_MAX_LENGTH: usize = 50;
pub const DESCRIPTION_MAX_LENGTH: usize = 500;
pub const SLOGAN_MAX_LENGTH: usize = 100;

/// Input for creating a team
#[derive(Debug, Clone, Default)]
pub struct NewTeam {
    pub name: String,
    pub description: String,
    pub members: Vec<Uuid>,
    pub team_slogan: Option<String>,
    pub expertise_level: Option<String>,
}

/// Partial update of a team
///
/// `team_slogan` distinguishes "leave as is" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct TeamChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub members: Option<Vec<Uuid>>,
    pub status: Option<String>,
    pub team_slogan: Option<Option<String>>,
    pub expertise_level: Option<String>,
}

impl TeamChanges {
    /// Validates every field before anything is written
    ///
    /// A rejected update therefore leaves the stored team untouched.
    pub fn validate(self) -> Result<TeamPatch, DomainError> {
        Ok(TeamPatch {
            name: self
                .name
                .map(|name| required_text(&name, "team name", NAME_MAX_LENGTH))
                .transpose()?,
            description: self
                .description
                .map(|d| validate_description(&d))
                .transpose()?,
            members: self.members.map(dedup),
            status: self.status.map(|s| s.parse()).transpose()?,
            team_slogan: self.team_slogan.map(validate_slogan).transpose()?,
            expertise_level: self
                .expertise_level
                .map(|level| level.parse())
                .transpose()?,
        })
    }
}

/// A validated partial update
///
/// Storage writes only the fields that are `Some`; `members` replaces the
/// whole member list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub members: Option<Vec<Uuid>>,
    pub status: Option<TeamStatus>,
    pub team_slogan: Option<Option<String>>,
    pub expertise_level: Option<ExpertiseLevel>,
}

/// Team aggregate root
///
/// A named group of users that owns projects.
///
/// # Invariants
/// - Name is trimmed, non-empty and at most 50 characters
/// - Description is non-empty and at most 500 characters
/// - Slogan, when present, is at most 100 characters
/// - Members contain no duplicates and keep insertion order
///
/// # Example
/// ```
/// use teamboard_api::domain::team::{NewTeam, Team, TeamStatus};
///
/// let team = Team::new(NewTeam {
///     name: "QA".to_string(),
///     description: "Testing".to_string(),
///     ..Default::default()
/// })
/// .expect("valid team");
///
/// assert_eq!(team.name(), "QA");
/// assert_eq!(team.status(), TeamStatus::Active);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    id: Uuid,
    name: String,
    description: String,
    members: Vec<Uuid>,
    status: TeamStatus,
    team_slogan: Option<String>,
    expertise_level: ExpertiseLevel,
    created_date: DateTime<Utc>,
}

impl Team {
    /// Creates a new Team aggregate
    ///
    /// # Business Rules Enforced
    /// - Field limits listed on the type
    /// - Initial status is always Active
    /// - Expertise level defaults to Intermediate
    pub fn new(input: NewTeam) -> Result<Self, DomainError> {
        let name = required_text(&input.name, "team name", NAME_MAX_LENGTH)?;
        let description = validate_description(&input.description)?;
        let team_slogan = validate_slogan(input.team_slogan)?;
        let expertise_level = match input.expertise_level {
            Some(level) => level.parse()?,
            None => ExpertiseLevel::default(),
        };

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            members: dedup(input.members),
            status: TeamStatus::default(),
            team_slogan,
            expertise_level,
            created_date: Utc::now(),
        })
    }

    /// Applies a validated partial update
    pub fn apply(&mut self, patch: TeamPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(members) = patch.members {
            self.members = members;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(team_slogan) = patch.team_slogan {
            self.team_slogan = team_slogan;
        }
        if let Some(expertise_level) = patch.expertise_level {
            self.expertise_level = expertise_level;
        }
    }

    /// Adds a member unless already present; returns whether it was added
    pub fn add_member(&mut self, user_id: Uuid) -> bool {
        if self.has_member(user_id) {
            return false;
        }
        self.members.push(user_id);
        true
    }

    /// Removes a member; returns whether it was present
    pub fn remove_member(&mut self, user_id: Uuid) -> bool {
        let before = self.members.len();
        self.members.retain(|id| *id != user_id);
        self.members.len() != before
    }

    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
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

    pub fn members(&self) -> &[Uuid] {
        &self.members
    }

    pub fn status(&self) -> TeamStatus {
        self.status
    }

    pub fn team_slogan(&self) -> Option<&str> {
        self.team_slogan.as_deref()
    }

    pub fn expertise_level(&self) -> ExpertiseLevel {
        self.expertise_level
    }

    pub fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    /// Reconstructs a Team from persistence layer data
    ///
    /// Bypasses validation; only for repository implementations.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        name: String,
        description: String,
        members: Vec<Uuid>,
        status: TeamStatus,
        team_slogan: Option<String>,
        expertise_level: ExpertiseLevel,
        created_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            members,
            status,
            team_slogan,
            expertise_level,
            created_date,
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

fn validate_slogan(slogan: Option<String>) -> Result<Option<String>, DomainError> {
    if let Some(ref slogan) = slogan {
        max_length(slogan, "team slogan", SLOGAN_MAX_LENGTH)?;
    }
    Ok(slogan)
}

fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}
