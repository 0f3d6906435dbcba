use async_graphql::{Context, MaybeUndefined, Object, ResultExt, ID};
use axum::http::header::SET_COOKIE;

use super::types::{AuthResponse, ProjectObject, TeamObject, UserObject};
use super::{parse_id, parse_ids, services, session};
use crate::domain::project::{NewProject, ProjectChanges};
use crate::domain::team::{NewTeam, TeamChanges};
use crate::domain::user::UserChanges;
use crate::services::Registration;

pub struct MutationRoot;

/// Splits "argument omitted" from "argument explicitly null"
fn nullable<T>(value: MaybeUndefined<T>) -> Option<Option<T>> {
    match value {
        MaybeUndefined::Undefined => None,
        MaybeUndefined::Null => Some(None),
        MaybeUndefined::Value(value) => Some(Some(value)),
    }
}

#[Object]
impl MutationRoot {
    /// Creates an account and signs it in (sets the `token` cookie)
    async fn register(
        &self,
        ctx: &Context<'_>,
        username: String,
        email: String,
        password: String,
        role: Option<String>,
    ) -> async_graphql::Result<AuthResponse> {
        let auth = &services(ctx)?.auth;
        let outcome = auth
            .register(Registration {
                username,
                email,
                password,
                role,
            })
            .await
            .extend()?;
        ctx.append_http_header(SET_COOKIE, auth.session_cookie(&outcome.token));
        Ok(outcome.into())
    }

    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> async_graphql::Result<AuthResponse> {
        let auth = &services(ctx)?.auth;
        let outcome = auth.login(&email, &password).await.extend()?;
        ctx.append_http_header(SET_COOKIE, auth.session_cookie(&outcome.token));
        Ok(outcome.into())
    }

    /// Clears the session cookie; always succeeds
    async fn logout(&self, ctx: &Context<'_>) -> async_graphql::Result<bool> {
        let auth = &services(ctx)?.auth;
        ctx.append_http_header(SET_COOKIE, auth.logout_cookie());
        Ok(true)
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        username: Option<String>,
        email: Option<String>,
        role: Option<String>,
    ) -> async_graphql::Result<UserObject> {
        let id = parse_id(&id, "User").extend()?;
        let user = services(ctx)?
            .users
            .update(
                session(ctx),
                id,
                UserChanges {
                    username,
                    email,
                    role,
                },
            )
            .await
            .extend()?;
        Ok(UserObject::from(&user))
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let id = parse_id(&id, "User").extend()?;
        services(ctx)?.users.delete(session(ctx), id).await.extend()
    }

    async fn create_team(
        &self,
        ctx: &Context<'_>,
        name: String,
        description: String,
        members: Option<Vec<ID>>,
        team_slogan: Option<String>,
        expertise_level: Option<String>,
    ) -> async_graphql::Result<TeamObject> {
        let members = parse_ids(&members.unwrap_or_default(), "User").extend()?;
        let team = services(ctx)?
            .teams
            .create(
                session(ctx),
                NewTeam {
                    name,
                    description,
                    members,
                    team_slogan,
                    expertise_level,
                },
            )
            .await
            .extend()?;
        Ok(team.into())
    }

    /// Partial update; `members`, when given, replaces the member set
    #[allow(clippy::too_many_arguments)]
    async fn update_team(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        description: Option<String>,
        members: Option<Vec<ID>>,
        status: Option<String>,
        team_slogan: MaybeUndefined<String>,
        expertise_level: Option<String>,
    ) -> async_graphql::Result<TeamObject> {
        let id = parse_id(&id, "Team").extend()?;
        let members = members
            .map(|ids| parse_ids(&ids, "User"))
            .transpose()
            .extend()?;
        let team = services(ctx)?
            .teams
            .update(
                session(ctx),
                id,
                TeamChanges {
                    name,
                    description,
                    members,
                    status,
                    team_slogan: nullable(team_slogan),
                    expertise_level,
                },
            )
            .await
            .extend()?;
        Ok(team.into())
    }

    /// Deletes a team and every project it owns
    async fn delete_team(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let id = parse_id(&id, "Team").extend()?;
        services(ctx)?.teams.delete(session(ctx), id).await.extend()
    }

    async fn add_member_to_team(
        &self,
        ctx: &Context<'_>,
        team_id: ID,
        user_id: ID,
    ) -> async_graphql::Result<TeamObject> {
        let team_id = parse_id(&team_id, "Team").extend()?;
        let user_id = parse_id(&user_id, "User").extend()?;
        let team = services(ctx)?
            .teams
            .add_member(session(ctx), team_id, user_id)
            .await
            .extend()?;
        Ok(team.into())
    }

    async fn remove_member_from_team(
        &self,
        ctx: &Context<'_>,
        team_id: ID,
        user_id: ID,
    ) -> async_graphql::Result<TeamObject> {
        let team_id = parse_id(&team_id, "Team").extend()?;
        let user_id = parse_id(&user_id, "User").extend()?;
        let team = services(ctx)?
            .teams
            .remove_member(session(ctx), team_id, user_id)
            .await
            .extend()?;
        Ok(team.into())
    }

    #[allow(clippy::too_many_arguments)]
    async fn create_project(
        &self,
        ctx: &Context<'_>,
        name: String,
        description: String,
        team_id: ID,
        start_date: String,
        end_date: Option<String>,
        status: Option<String>,
    ) -> async_graphql::Result<ProjectObject> {
        let team_id = parse_id(&team_id, "Team").extend()?;
        let project = services(ctx)?
            .projects
            .create(
                session(ctx),
                NewProject {
                    name,
                    description,
                    team_id,
                    start_date,
                    end_date,
                    status,
                },
            )
            .await
            .extend()?;
        Ok(project.into())
    }

    #[allow(clippy::too_many_arguments)]
    async fn update_project(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        description: Option<String>,
        team_id: Option<ID>,
        start_date: Option<String>,
        end_date: MaybeUndefined<String>,
        status: Option<String>,
    ) -> async_graphql::Result<ProjectObject> {
        let id = parse_id(&id, "Project").extend()?;
        let team_id = team_id
            .map(|team_id| parse_id(&team_id, "Team"))
            .transpose()
            .extend()?;
        let project = services(ctx)?
            .projects
            .update(
                session(ctx),
                id,
                ProjectChanges {
                    name,
                    description,
                    team_id,
                    start_date,
                    end_date: nullable(end_date),
                    status,
                },
            )
            .await
            .extend()?;
        Ok(project.into())
    }

    async fn delete_project(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let id = parse_id(&id, "Project").extend()?;
        services(ctx)?.projects.delete(session(ctx), id).await.extend()
    }

    /// Admins may set any project's status; members only their teams' projects
    async fn update_project_status(
        &self,
        ctx: &Context<'_>,
        id: ID,
        status: String,
    ) -> async_graphql::Result<ProjectObject> {
        let id = parse_id(&id, "Project").extend()?;
        let project = services(ctx)?
            .projects
            .update_status(session(ctx), id, &status)
            .await
            .extend()?;
        Ok(project.into())
    }
}
