// Relationship population: Team -> members, Project -> team -> members

use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::project::Project;
use crate::domain::repositories::{TeamRepository, UserRepository};
use crate::domain::team::Team;
use crate::domain::user::User;

/// A team with its member records resolved
#[derive(Debug, Clone)]
pub struct TeamDetails {
    pub team: Team,
    pub members: Vec<User>,
}

/// A project with its owning team (and that team's members) resolved
#[derive(Debug, Clone)]
pub struct ProjectDetails {
    pub project: Project,
    pub team: TeamDetails,
}

pub async fn team(users: &dyn UserRepository, team: Team) -> Result<TeamDetails, DomainError> {
    let members = users.find_by_ids(team.members()).await?;
    Ok(TeamDetails { team, members })
}

/// Populates several teams with a single user lookup
pub async fn teams(
    users: &dyn UserRepository,
    teams: Vec<Team>,
) -> Result<Vec<TeamDetails>, DomainError> {
    let mut ids: Vec<Uuid> = Vec::new();
    for team in &teams {
        for id in team.members() {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
    }

    let by_id: HashMap<Uuid, User> = users
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(teams
        .into_iter()
        .map(|team| {
            let members = team
                .members()
                .iter()
                .filter_map(|id| by_id.get(id).cloned())
                .collect();
            TeamDetails { team, members }
        })
        .collect())
}

pub async fn project(
    teams: &dyn TeamRepository,
    users: &dyn UserRepository,
    project: Project,
) -> Result<ProjectDetails, DomainError> {
    let mut populated = projects(teams, users, vec![project]).await?;
    populated
        .pop()
        .ok_or_else(|| DomainError::internal("project population returned nothing"))
}

/// Populates several projects, loading each distinct team once
pub async fn projects(
    teams: &dyn TeamRepository,
    users: &dyn UserRepository,
    projects: Vec<Project>,
) -> Result<Vec<ProjectDetails>, DomainError> {
    let mut cache: HashMap<Uuid, TeamDetails> = HashMap::new();
    let mut populated = Vec::with_capacity(projects.len());

    for project in projects {
        let team_id = project.team_id();
        if !cache.contains_key(&team_id) {
            let owning = teams.find_by_id(team_id).await?.ok_or_else(|| {
                DomainError::storage(format!(
                    "Project {} references missing team {}",
                    project.id(),
                    team_id
                ))
            })?;
            cache.insert(team_id, team(users, owning).await?);
        }
        let owner = cache[&team_id].clone();
        populated.push(ProjectDetails {
            project,
            team: owner,
        });
    }

    Ok(populated)
}
