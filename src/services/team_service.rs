use uuid::Uuid;

use super::populate::{self, TeamDetails};
use super::{authorize_read, Repositories};
use crate::auth::Session;
use crate::config::ReadAccess;
use crate::domain::error::DomainError;
use crate::domain::team::{NewTeam, Team, TeamChanges};

/// Team queries and administration
#[derive(Clone)]
pub struct TeamService {
    repos: Repositories,
    read_access: ReadAccess,
}

impl TeamService {
    pub fn new(repos: Repositories, read_access: ReadAccess) -> Self {
        Self { repos, read_access }
    }

    pub async fn list(&self, session: &Session) -> Result<Vec<TeamDetails>, DomainError> {
        authorize_read(self.read_access, session)?;
        let teams = self.repos.teams.find_all().await?;
        populate::teams(self.repos.users.as_ref(), teams).await
    }

    pub async fn get(&self, session: &Session, id: Uuid) -> Result<Option<TeamDetails>, DomainError> {
        authorize_read(self.read_access, session)?;
        match self.repos.teams.find_by_id(id).await? {
            Some(team) => Ok(Some(populate::team(self.repos.users.as_ref(), team).await?)),
            None => Ok(None),
        }
    }

    /// Teams whose member set contains `user_id`
    pub async fn by_member(
        &self,
        session: &Session,
        user_id: Uuid,
    ) -> Result<Vec<TeamDetails>, DomainError> {
        authorize_read(self.read_access, session)?;
        let teams = self.repos.teams.find_by_member(user_id).await?;
        populate::teams(self.repos.users.as_ref(), teams).await
    }

    pub async fn create(&self, session: &Session, input: NewTeam) -> Result<TeamDetails, DomainError> {
        let actor = session.require_admin()?;
        let team = Team::new(input)?;
        self.ensure_users_exist(team.members()).await?;
        self.repos.teams.create(&team).await?;

        tracing::info!(actor = %actor.id, team_id = %team.id(), "team created");
        populate::team(self.repos.users.as_ref(), team).await
    }

    /// Partial update; `members`, when given, replaces the whole set
    pub async fn update(
        &self,
        session: &Session,
        id: Uuid,
        changes: TeamChanges,
    ) -> Result<TeamDetails, DomainError> {
        let actor = session.require_admin()?;
        let patch = changes.validate()?;
        if let Some(ref members) = patch.members {
            self.ensure_users_exist(members).await?;
        }
        let team = self
            .repos
            .teams
            .patch(id, &patch)
            .await?
            .ok_or_else(|| DomainError::missing("Team", id))?;

        tracing::info!(actor = %actor.id, team_id = %id, "team updated");
        populate::team(self.repos.users.as_ref(), team).await
    }

    /// Deletes a team together with its projects
    pub async fn delete(&self, session: &Session, id: Uuid) -> Result<bool, DomainError> {
        let actor = session.require_admin()?;
        if !self.repos.teams.delete(id).await? {
            return Err(DomainError::missing("Team", id));
        }

        tracing::info!(actor = %actor.id, team_id = %id, "team deleted");
        Ok(true)
    }

    /// Adds a user to a team; adding an existing member is a no-op
    pub async fn add_member(
        &self,
        session: &Session,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<TeamDetails, DomainError> {
        let actor = session.require_admin()?;
        if self.repos.teams.add_member(team_id, user_id).await? {
            tracing::info!(actor = %actor.id, team_id = %team_id, user_id = %user_id, "member added");
        }

        let team = self.load(team_id).await?;
        populate::team(self.repos.users.as_ref(), team).await
    }

    /// Removes a user from a team; removing a non-member is a no-op
    pub async fn remove_member(
        &self,
        session: &Session,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<TeamDetails, DomainError> {
        let actor = session.require_admin()?;
        if self.repos.teams.remove_member(team_id, user_id).await? {
            tracing::info!(actor = %actor.id, team_id = %team_id, user_id = %user_id, "member removed");
        }

        let team = self.load(team_id).await?;
        populate::team(self.repos.users.as_ref(), team).await
    }

    async fn load(&self, id: Uuid) -> Result<Team, DomainError> {
        self.repos
            .teams
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::missing("Team", id))
    }

    async fn ensure_users_exist(&self, ids: &[Uuid]) -> Result<(), DomainError> {
        if ids.is_empty() {
            return Ok(());
        }
        let found = self.repos.users.find_by_ids(ids).await?;
        match ids.iter().find(|id| !found.iter().any(|u| u.id == **id)) {
            Some(missing) => Err(DomainError::missing("User", missing)),
            None => Ok(()),
        }
    }
}
