use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::project::{Project, ProjectPatch, ProjectStatus};

/// Outcome of a guarded status write
#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdate {
    Updated(Project),
    /// The project exists but its team does not include the acting user
    NotMember,
    Missing,
}

/// Repository trait for Project aggregate
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a new project; `NotFound` if its team does not exist
    async fn create(&self, project: &Project) -> Result<(), DomainError>;

    /// Find a project by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError>;

    /// List every project, oldest first
    async fn find_all(&self) -> Result<Vec<Project>, DomainError>;

    /// Find all projects owned by a team
    async fn find_by_team(&self, team_id: Uuid) -> Result<Vec<Project>, DomainError>;

    /// Write the fields a patch carries and return the stored result
    ///
    /// Returns None when no such project exists. `NotFound` when the patch
    /// moves the project to an unknown team; `Validation` when the merged
    /// dates are out of order.
    async fn patch(&self, id: Uuid, patch: &ProjectPatch)
        -> Result<Option<Project>, DomainError>;

    /// Set only the status column
    ///
    /// With `member` set, the write happens only if that user belongs to the
    /// project's team at the moment of writing.
    async fn update_status(
        &self,
        id: Uuid,
        status: ProjectStatus,
        member: Option<Uuid>,
    ) -> Result<StatusUpdate, DomainError>;

    /// Delete a project; returns false when no such project existed
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
