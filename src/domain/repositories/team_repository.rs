use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::team::{Team, TeamPatch};

/// Repository trait for Team aggregate
///
/// Defines the contract for persisting and retrieving teams together with
/// their member lists. Duplicate team names surface as
/// `DomainError::Conflict`.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Insert a new team
    async fn create(&self, team: &Team) -> Result<(), DomainError>;

    /// Find a team by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, DomainError>;

    /// List every team, oldest first
    async fn find_all(&self) -> Result<Vec<Team>, DomainError>;

    /// Find all teams the user is a member of
    async fn find_by_member(&self, user_id: Uuid) -> Result<Vec<Team>, DomainError>;

    /// Write the fields a patch carries and return the stored result
    ///
    /// Fields the patch leaves out keep whatever value is stored, so
    /// concurrent patches to different fields both survive. Returns None
    /// when no such team exists. `NotFound` if a new member list names an
    /// unknown user.
    async fn patch(&self, id: Uuid, patch: &TeamPatch) -> Result<Option<Team>, DomainError>;

    /// Append a user to a team's member list in one atomic step
    ///
    /// Returns false when the user was already a member. `NotFound` when
    /// the team or the user does not exist.
    async fn add_member(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, DomainError>;

    /// Remove a user from a team's member list in one atomic step
    ///
    /// Returns false when the user was not a member. `NotFound` when the
    /// team does not exist.
    async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, DomainError>;

    /// Delete a team and every project that references it
    ///
    /// Returns false when no such team existed.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
