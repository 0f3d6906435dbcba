// GraphQL output records
// Each entity has one fixed serializer; password hashes never appear here

use async_graphql::{SimpleObject, ID};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::user::User;
use crate::services::{AuthOutcome, ProjectDetails, TeamDetails};

/// RFC 3339 in UTC with millisecond precision, e.g. `2025-01-01T00:00:00.000Z`
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "User")]
pub struct UserObject {
    pub id: ID,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

impl From<&User> for UserObject {
    fn from(user: &User) -> Self {
        Self {
            id: ID(user.id.to_string()),
            username: user.username.to_string(),
            email: user.email.to_string(),
            role: user.role.to_string(),
            created_at: timestamp(user.created_at),
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Team")]
pub struct TeamObject {
    pub id: ID,
    pub name: String,
    pub description: String,
    pub members: Vec<UserObject>,
    pub created_date: String,
    pub status: String,
    pub team_slogan: Option<String>,
    pub expertise_level: String,
}

impl From<TeamDetails> for TeamObject {
    fn from(details: TeamDetails) -> Self {
        let TeamDetails { team, members } = details;
        Self {
            id: ID(team.id().to_string()),
            name: team.name().to_string(),
            description: team.description().to_string(),
            members: members.iter().map(UserObject::from).collect(),
            created_date: timestamp(team.created_date()),
            status: team.status().to_string(),
            team_slogan: team.team_slogan().map(str::to_string),
            expertise_level: team.expertise_level().to_string(),
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Project")]
pub struct ProjectObject {
    pub id: ID,
    pub name: String,
    pub description: String,
    pub team: TeamObject,
    pub start_date: String,
    pub end_date: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<ProjectDetails> for ProjectObject {
    fn from(details: ProjectDetails) -> Self {
        let ProjectDetails { project, team } = details;
        Self {
            id: ID(project.id().to_string()),
            name: project.name().to_string(),
            description: project.description().to_string(),
            team: team.into(),
            start_date: timestamp(project.start_date()),
            end_date: project.end_date().map(timestamp),
            status: project.status().to_string(),
            created_at: timestamp(project.created_at()),
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserObject,
}

impl From<AuthOutcome> for AuthResponse {
    fn from(outcome: AuthOutcome) -> Self {
        Self {
            token: outcome.token,
            user: UserObject::from(&outcome.user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_use_millis_and_z() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(timestamp(at), "2025-01-01T00:00:00.000Z");
    }
}
