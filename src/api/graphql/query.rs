use async_graphql::{Context, Object, ResultExt, ID};

use super::types::{ProjectObject, TeamObject, UserObject};
use super::{lookup_id, services, session};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The signed-in user
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<UserObject> {
        let user = services(ctx)?.users.me(session(ctx)).extend()?;
        Ok(UserObject::from(&user))
    }

    /// Every user (Admin only)
    async fn users(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<UserObject>> {
        let users = services(ctx)?.users.list(session(ctx)).await.extend()?;
        Ok(users.iter().map(UserObject::from).collect())
    }

    /// One user (Admin or the user themself)
    async fn user(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<UserObject>> {
        let id = lookup_id(&id);
        let user = services(ctx)?.users.get(session(ctx), id).await.extend()?;
        Ok(user.as_ref().map(UserObject::from))
    }

    async fn teams(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<TeamObject>> {
        let teams = services(ctx)?.teams.list(session(ctx)).await.extend()?;
        Ok(teams.into_iter().map(TeamObject::from).collect())
    }

    async fn team(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<TeamObject>> {
        let id = lookup_id(&id);
        let team = services(ctx)?.teams.get(session(ctx), id).await.extend()?;
        Ok(team.map(TeamObject::from))
    }

    /// Teams the given user belongs to
    async fn teams_by_member(
        &self,
        ctx: &Context<'_>,
        user_id: ID,
    ) -> async_graphql::Result<Vec<TeamObject>> {
        let user_id = lookup_id(&user_id);
        let teams = services(ctx)?
            .teams
            .by_member(session(ctx), user_id)
            .await
            .extend()?;
        Ok(teams.into_iter().map(TeamObject::from).collect())
    }

    async fn projects(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<ProjectObject>> {
        let projects = services(ctx)?.projects.list(session(ctx)).await.extend()?;
        Ok(projects.into_iter().map(ProjectObject::from).collect())
    }

    async fn project(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<ProjectObject>> {
        let id = lookup_id(&id);
        let project = services(ctx)?.projects.get(session(ctx), id).await.extend()?;
        Ok(project.map(ProjectObject::from))
    }

    /// Projects owned by the given team
    async fn projects_by_team(
        &self,
        ctx: &Context<'_>,
        team_id: ID,
    ) -> async_graphql::Result<Vec<ProjectObject>> {
        let team_id = lookup_id(&team_id);
        let projects = services(ctx)?
            .projects
            .by_team(session(ctx), team_id)
            .await
            .extend()?;
        Ok(projects.into_iter().map(ProjectObject::from).collect())
    }
}
