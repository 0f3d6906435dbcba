use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::project::{Project, ProjectPatch, ProjectStatus};
use crate::domain::repositories::{
    ProjectRepository, StatusUpdate, TeamRepository, UserRepository,
};
use crate::domain::team::{Team, TeamPatch};
use crate::domain::user::User;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    teams: Vec<Team>,
    projects: Vec<Project>,
}

/// Process-local store backing all three repositories
///
/// Every repository call takes the single lock once, so cascades (user
/// removal from teams, project removal with their team) are atomic.
/// Used for development (`STORAGE_BACKEND=memory`) and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repository(&self) -> InMemoryUserRepository {
        InMemoryUserRepository { store: self.clone() }
    }

    pub fn team_repository(&self) -> InMemoryTeamRepository {
        InMemoryTeamRepository { store: self.clone() }
    }

    pub fn project_repository(&self) -> InMemoryProjectRepository {
        InMemoryProjectRepository { store: self.clone() }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, DomainError> {
        self.tables
            .read()
            .map_err(|_| DomainError::storage("in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, DomainError> {
        self.tables
            .write()
            .map_err(|_| DomainError::storage("in-memory store lock poisoned"))
    }
}

fn check_user_unique(tables: &Tables, user: &User) -> Result<(), DomainError> {
    for other in tables.users.iter().filter(|u| u.id != user.id) {
        if other.email == user.email {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }
        if other.username == user.username {
            return Err(DomainError::conflict(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
    }
    Ok(())
}

fn check_team_unique(tables: &Tables, team: &Team) -> Result<(), DomainError> {
    let duplicate = tables
        .teams
        .iter()
        .any(|t| t.id() != team.id() && t.name() == team.name());
    if duplicate {
        return Err(DomainError::conflict(format!(
            "A team named '{}' already exists",
            team.name()
        )));
    }
    Ok(())
}

fn check_members_exist(tables: &Tables, members: &[Uuid]) -> Result<(), DomainError> {
    match members
        .iter()
        .find(|id| !tables.users.iter().any(|u| u.id == **id))
    {
        Some(unknown) => Err(DomainError::missing("User", *unknown)),
        None => Ok(()),
    }
}

fn check_team_exists(tables: &Tables, team_id: Uuid) -> Result<(), DomainError> {
    if tables.teams.iter().any(|t| t.id() == team_id) {
        Ok(())
    } else {
        Err(DomainError::missing("Team", team_id))
    }
}

/// In-memory implementation of UserRepository
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        let mut tables = self.store.write()?;
        check_user_unique(&tables, user)?;
        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let tables = self.store.read()?;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let tables = self.store.read()?;
        Ok(tables.users.iter().find(|u| u.email.as_str() == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
        let tables = self.store.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.iter().find(|u| u.id == *id).cloned())
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.store.read()?.users.clone())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut tables = self.store.write()?;
        check_user_unique(&tables, user)?;
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| DomainError::missing("User", user.id))?;
        *slot = user.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.store.write()?;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }
        for team in tables.teams.iter_mut() {
            team.remove_member(id);
        }
        Ok(true)
    }
}

/// In-memory implementation of TeamRepository
#[derive(Debug, Clone)]
pub struct InMemoryTeamRepository {
    store: InMemoryStore,
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn create(&self, team: &Team) -> Result<(), DomainError> {
        let mut tables = self.store.write()?;
        check_team_unique(&tables, team)?;
        check_members_exist(&tables, team.members())?;
        tables.teams.push(team.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, DomainError> {
        let tables = self.store.read()?;
        Ok(tables.teams.iter().find(|t| t.id() == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Team>, DomainError> {
        Ok(self.store.read()?.teams.clone())
    }

    async fn find_by_member(&self, user_id: Uuid) -> Result<Vec<Team>, DomainError> {
        let tables = self.store.read()?;
        Ok(tables
            .teams
            .iter()
            .filter(|t| t.has_member(user_id))
            .cloned()
            .collect())
    }

    async fn patch(&self, id: Uuid, patch: &TeamPatch) -> Result<Option<Team>, DomainError> {
        let mut tables = self.store.write()?;
        let Some(index) = tables.teams.iter().position(|t| t.id() == id) else {
            return Ok(None);
        };
        if let Some(ref members) = patch.members {
            check_members_exist(&tables, members)?;
        }

        let mut team = tables.teams[index].clone();
        team.apply(patch.clone());
        check_team_unique(&tables, &team)?;
        tables.teams[index] = team.clone();
        Ok(Some(team))
    }

    async fn add_member(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.store.write()?;
        check_team_exists(&tables, team_id)?;
        check_members_exist(&tables, &[user_id])?;
        Ok(tables
            .teams
            .iter_mut()
            .find(|t| t.id() == team_id)
            .is_some_and(|team| team.add_member(user_id)))
    }

    async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.store.write()?;
        let team = tables
            .teams
            .iter_mut()
            .find(|t| t.id() == team_id)
            .ok_or_else(|| DomainError::missing("Team", team_id))?;
        Ok(team.remove_member(user_id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.store.write()?;
        let before = tables.teams.len();
        tables.teams.retain(|t| t.id() != id);
        if tables.teams.len() == before {
            return Ok(false);
        }
        tables.projects.retain(|p| p.team_id() != id);
        Ok(true)
    }
}

/// In-memory implementation of ProjectRepository
#[derive(Debug, Clone)]
pub struct InMemoryProjectRepository {
    store: InMemoryStore,
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn create(&self, project: &Project) -> Result<(), DomainError> {
        let mut tables = self.store.write()?;
        check_team_exists(&tables, project.team_id())?;
        tables.projects.push(project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError> {
        let tables = self.store.read()?;
        Ok(tables.projects.iter().find(|p| p.id() == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Project>, DomainError> {
        Ok(self.store.read()?.projects.clone())
    }

    async fn find_by_team(&self, team_id: Uuid) -> Result<Vec<Project>, DomainError> {
        let tables = self.store.read()?;
        Ok(tables
            .projects
            .iter()
            .filter(|p| p.team_id() == team_id)
            .cloned()
            .collect())
    }

    async fn patch(
        &self,
        id: Uuid,
        patch: &ProjectPatch,
    ) -> Result<Option<Project>, DomainError> {
        let mut tables = self.store.write()?;
        let Some(index) = tables.projects.iter().position(|p| p.id() == id) else {
            return Ok(None);
        };
        if let Some(team_id) = patch.team_id {
            check_team_exists(&tables, team_id)?;
        }

        let mut project = tables.projects[index].clone();
        project.apply(patch.clone())?;
        tables.projects[index] = project.clone();
        Ok(Some(project))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ProjectStatus,
        member: Option<Uuid>,
    ) -> Result<StatusUpdate, DomainError> {
        let mut tables = self.store.write()?;
        let Some(index) = tables.projects.iter().position(|p| p.id() == id) else {
            return Ok(StatusUpdate::Missing);
        };
        if let Some(user_id) = member {
            let team_id = tables.projects[index].team_id();
            let belongs = tables
                .teams
                .iter()
                .any(|t| t.id() == team_id && t.has_member(user_id));
            if !belongs {
                return Ok(StatusUpdate::NotMember);
            }
        }

        let project = &mut tables.projects[index];
        project.set_status(status);
        Ok(StatusUpdate::Updated(project.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.store.write()?;
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id() != id);
        Ok(tables.projects.len() != before)
    }
}
