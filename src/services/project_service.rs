use uuid::Uuid;

use super::populate::{self, ProjectDetails};
use super::{authorize_read, Repositories};
use crate::auth::Session;
use crate::config::ReadAccess;
use crate::domain::error::DomainError;
use crate::domain::project::{NewProject, Project, ProjectChanges, ProjectStatus};
use crate::domain::repositories::StatusUpdate;

/// Project queries and administration
#[derive(Clone)]
pub struct ProjectService {
    repos: Repositories,
    read_access: ReadAccess,
}

impl ProjectService {
    pub fn new(repos: Repositories, read_access: ReadAccess) -> Self {
        Self { repos, read_access }
    }

    pub async fn list(&self, session: &Session) -> Result<Vec<ProjectDetails>, DomainError> {
        authorize_read(self.read_access, session)?;
        let projects = self.repos.projects.find_all().await?;
        self.populate_all(projects).await
    }

    pub async fn get(
        &self,
        session: &Session,
        id: Uuid,
    ) -> Result<Option<ProjectDetails>, DomainError> {
        authorize_read(self.read_access, session)?;
        match self.repos.projects.find_by_id(id).await? {
            Some(project) => Ok(Some(self.populate(project).await?)),
            None => Ok(None),
        }
    }

    pub async fn by_team(
        &self,
        session: &Session,
        team_id: Uuid,
    ) -> Result<Vec<ProjectDetails>, DomainError> {
        authorize_read(self.read_access, session)?;
        let projects = self.repos.projects.find_by_team(team_id).await?;
        self.populate_all(projects).await
    }

    /// Creates a project under an existing team; status defaults to Pending
    pub async fn create(
        &self,
        session: &Session,
        input: NewProject,
    ) -> Result<ProjectDetails, DomainError> {
        let actor = session.require_admin()?;
        let project = Project::new(input)?;
        self.ensure_team_exists(project.team_id()).await?;
        self.repos.projects.create(&project).await?;

        tracing::info!(
            actor = %actor.id,
            project_id = %project.id(),
            team_id = %project.team_id(),
            "project created"
        );
        self.populate(project).await
    }

    pub async fn update(
        &self,
        session: &Session,
        id: Uuid,
        changes: ProjectChanges,
    ) -> Result<ProjectDetails, DomainError> {
        let actor = session.require_admin()?;
        let patch = changes.validate()?;
        if let Some(team_id) = patch.team_id {
            self.ensure_team_exists(team_id).await?;
        }
        let project = self
            .repos
            .projects
            .patch(id, &patch)
            .await?
            .ok_or_else(|| DomainError::missing("Project", id))?;

        tracing::info!(actor = %actor.id, project_id = %id, "project updated");
        self.populate(project).await
    }

    pub async fn delete(&self, session: &Session, id: Uuid) -> Result<bool, DomainError> {
        let actor = session.require_admin()?;
        if !self.repos.projects.delete(id).await? {
            return Err(DomainError::missing("Project", id));
        }

        tracing::info!(actor = %actor.id, project_id = %id, "project deleted");
        Ok(true)
    }

    /// Sets a project's status
    ///
    /// Admins may update any project; other users only projects owned by a
    /// team they belong to when the status is written.
    pub async fn update_status(
        &self,
        session: &Session,
        id: Uuid,
        status: &str,
    ) -> Result<ProjectDetails, DomainError> {
        let actor = session.require_authenticated()?;
        let status: ProjectStatus = status.parse()?;
        let member = (!actor.is_admin()).then_some(actor.id);

        let project = match self.repos.projects.update_status(id, status, member).await? {
            StatusUpdate::Updated(project) => project,
            StatusUpdate::NotMember => {
                tracing::debug!(actor = %actor.id, project_id = %id, "status update refused");
                return Err(DomainError::NotAuthorized);
            }
            StatusUpdate::Missing => return Err(DomainError::missing("Project", id)),
        };

        tracing::info!(actor = %actor.id, project_id = %id, status = %status, "project status updated");
        self.populate(project).await
    }

    async fn ensure_team_exists(&self, team_id: Uuid) -> Result<(), DomainError> {
        match self.repos.teams.find_by_id(team_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::missing("Team", team_id)),
        }
    }

    async fn populate(&self, project: Project) -> Result<ProjectDetails, DomainError> {
        populate::project(self.repos.teams.as_ref(), self.repos.users.as_ref(), project).await
    }

    async fn populate_all(&self, projects: Vec<Project>) -> Result<Vec<ProjectDetails>, DomainError> {
        populate::projects(self.repos.teams.as_ref(), self.repos.users.as_ref(), projects).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::team::{NewTeam, Team};
    use crate::services::test_support::{id_of, Fixture, Interleaved};

    fn ops() -> Team {
        Team::new(NewTeam {
            name: "Ops".to_string(),
            description: "Operations".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    async fn qa_with_audit(fx: &Fixture, members: Vec<Uuid>) -> (Uuid, Uuid) {
        let team = Team::new(NewTeam {
            name: "QA".to_string(),
            description: "Quality assurance".to_string(),
            members,
            ..Default::default()
        })
        .unwrap();
        fx.repos.teams.create(&team).await.unwrap();

        let projects = ProjectService::new(fx.repos.clone(), ReadAccess::Public);
        let created = projects
            .create(&fx.admin, audit(team.id()))
            .await
            .unwrap();
        (team.id(), created.project.id())
    }

    fn audit(team_id: Uuid) -> NewProject {
        NewProject {
            name: "Audit".to_string(),
            description: "Yearly audit".to_string(),
            team_id,
            start_date: "2025-01-01".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn new_project_defaults_to_pending() {
        let fx = Fixture::new().await;
        let (team_id, project_id) = qa_with_audit(&fx, vec![]).await;
        let projects = ProjectService::new(fx.repos.clone(), ReadAccess::Public);

        let audit = projects.get(&Session::Anonymous, project_id).await.unwrap().unwrap();
        assert_eq!(audit.project.status(), ProjectStatus::Pending);
        assert_eq!(audit.team.team.id(), team_id);
        assert_eq!(audit.team.team.name(), "QA");
    }

    #[tokio::test]
    async fn create_requires_existing_team() {
        let fx = Fixture::new().await;
        let projects = ProjectService::new(fx.repos.clone(), ReadAccess::Public);

        let err = projects
            .create(&fx.admin, audit(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Team with ID"));
    }

    #[tokio::test]
    async fn create_is_admin_only() {
        let fx = Fixture::new().await;
        let (team_id, _) = qa_with_audit(&fx, vec![id_of(&fx.member)]).await;
        let projects = ProjectService::new(fx.repos.clone(), ReadAccess::Public);

        assert_eq!(
            projects.create(&fx.member, audit(team_id)).await.unwrap_err(),
            DomainError::NotAuthorized
        );
    }

    #[tokio::test]
    async fn non_member_cannot_update_status() {
        let fx = Fixture::new().await;
        let (_, project_id) = qa_with_audit(&fx, vec![]).await;
        let projects = ProjectService::new(fx.repos.clone(), ReadAccess::Public);

        let err = projects
            .update_status(&fx.member, project_id, "Completed")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Not authorized");

        let unchanged = fx.repos.projects.find_by_id(project_id).await.unwrap().unwrap();
        assert_eq!(unchanged.status(), ProjectStatus::Pending);
    }

    #[tokio::test]
    async fn team_member_and_admin_update_status() {
        let fx = Fixture::new().await;
        let (_, project_id) = qa_with_audit(&fx, vec![id_of(&fx.member)]).await;
        let projects = ProjectService::new(fx.repos.clone(), ReadAccess::Public);

        let updated = projects
            .update_status(&fx.member, project_id, "In Progress")
            .await
            .unwrap();
        assert_eq!(updated.project.status(), ProjectStatus::InProgress);

        let updated = projects
            .update_status(&fx.admin, project_id, "Completed")
            .await
            .unwrap();
        assert_eq!(updated.project.status(), ProjectStatus::Completed);
    }

    #[tokio::test]
    async fn membership_in_another_team_does_not_count() {
        let fx = Fixture::new().await;
        let (_, project_id) = qa_with_audit(&fx, vec![]).await;
        let other = Team::new(NewTeam {
            name: "Ops".to_string(),
            description: "Operations".to_string(),
            members: vec![id_of(&fx.member)],
            ..Default::default()
        })
        .unwrap();
        fx.repos.teams.create(&other).await.unwrap();
        let projects = ProjectService::new(fx.repos.clone(), ReadAccess::Public);

        assert_eq!(
            projects
                .update_status(&fx.member, project_id, "Completed")
                .await
                .unwrap_err(),
            DomainError::NotAuthorized
        );
    }

    #[tokio::test]
    async fn update_status_edge_cases() {
        let fx = Fixture::new().await;
        let (_, project_id) = qa_with_audit(&fx, vec![]).await;
        let projects = ProjectService::new(fx.repos.clone(), ReadAccess::Public);

        assert_eq!(
            projects
                .update_status(&Session::Anonymous, project_id, "Completed")
                .await
                .unwrap_err(),
            DomainError::NotAuthenticated
        );
        assert!(matches!(
            projects.update_status(&fx.admin, project_id, "Done").await,
            Err(DomainError::Validation { .. })
        ));
        assert!(matches!(
            projects.update_status(&fx.admin, Uuid::new_v4(), "Completed").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn update_moves_project_and_checks_dates() {
        let fx = Fixture::new().await;
        let (qa_id, project_id) = qa_with_audit(&fx, vec![]).await;
        let ops = ops();
        fx.repos.teams.create(&ops).await.unwrap();
        let projects = ProjectService::new(fx.repos.clone(), ReadAccess::Public);

        let moved = projects
            .update(
                &fx.admin,
                project_id,
                ProjectChanges {
                    team_id: Some(ops.id()),
                    end_date: Some(Some("2025-06-30".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.team.team.name(), "Ops");
        assert!(projects.by_team(&fx.member, qa_id).await.unwrap().is_empty());

        let err = projects
            .update(
                &fx.admin,
                project_id,
                ProjectChanges {
                    end_date: Some(Some("2024-01-01".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "End date cannot be before start date");

        assert!(projects
            .update(
                &fx.admin,
                project_id,
                ProjectChanges {
                    team_id: Some(Uuid::new_v4()),
                    ..Default::default()
                },
            )
            .await
            .is_err());
    }

    #[tokio::test]
    async fn delete_project() {
        let fx = Fixture::new().await;
        let (_, project_id) = qa_with_audit(&fx, vec![]).await;
        let projects = ProjectService::new(fx.repos.clone(), ReadAccess::Public);

        assert_eq!(
            projects.delete(&fx.member, project_id).await.unwrap_err(),
            DomainError::NotAuthorized
        );
        assert!(projects.delete(&fx.admin, project_id).await.unwrap());
        assert!(projects.list(&fx.admin).await.unwrap().is_empty());
        assert!(matches!(
            projects.delete(&fx.admin, project_id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn status_change_keeps_concurrent_admin_edit() {
        let fx = Fixture::new().await;
        let (_, project_id) = qa_with_audit(&fx, vec![id_of(&fx.member)]).await;
        let ops = ops();
        fx.repos.teams.create(&ops).await.unwrap();

        let store = fx.repos.projects.clone();
        let ops_id = ops.id();
        let admin_edit = async move {
            let patch = ProjectChanges {
                name: Some("Renamed".to_string()),
                team_id: Some(ops_id),
                ..Default::default()
            }
            .validate()
            .unwrap();
            store.patch(project_id, &patch).await.unwrap();
        };
        let mut repos = fx.repos.clone();
        repos.projects = Arc::new(Interleaved::new(fx.repos.projects.clone(), admin_edit));
        let projects = ProjectService::new(repos, ReadAccess::Public);

        projects
            .update_status(&fx.member, project_id, "Completed")
            .await
            .unwrap();

        let stored = fx.repos.projects.find_by_id(project_id).await.unwrap().unwrap();
        assert_eq!(stored.name(), "Renamed");
        assert_eq!(stored.team_id(), ops_id);
        assert_eq!(stored.status(), ProjectStatus::Completed);
    }

    #[tokio::test]
    async fn member_loses_status_rights_once_project_moves() {
        let fx = Fixture::new().await;
        let (_, project_id) = qa_with_audit(&fx, vec![id_of(&fx.member)]).await;
        let ops = ops();
        fx.repos.teams.create(&ops).await.unwrap();
        let projects = ProjectService::new(fx.repos.clone(), ReadAccess::Public);

        projects
            .update(
                &fx.admin,
                project_id,
                ProjectChanges {
                    team_id: Some(ops.id()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            projects
                .update_status(&fx.member, project_id, "Completed")
                .await
                .unwrap_err(),
            DomainError::NotAuthorized
        );
        let stored = fx.repos.projects.find_by_id(project_id).await.unwrap().unwrap();
        assert_eq!(stored.status(), ProjectStatus::Pending);
        assert_eq!(stored.team_id(), ops.id());
    }

    #[tokio::test]
    async fn concurrent_project_updates_to_different_fields_both_survive() {
        let fx = Fixture::new().await;
        let (_, project_id) = qa_with_audit(&fx, vec![]).await;

        let store = fx.repos.projects.clone();
        let reschedule = async move {
            let patch = ProjectChanges {
                end_date: Some(Some("2025-12-31".to_string())),
                ..Default::default()
            }
            .validate()
            .unwrap();
            store.patch(project_id, &patch).await.unwrap();
        };
        let mut repos = fx.repos.clone();
        repos.projects = Arc::new(Interleaved::new(fx.repos.projects.clone(), reschedule));
        let projects = ProjectService::new(repos, ReadAccess::Public);

        projects
            .update(
                &fx.admin,
                project_id,
                ProjectChanges {
                    description: Some("Quarterly audit".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let stored = fx.repos.projects.find_by_id(project_id).await.unwrap().unwrap();
        assert_eq!(stored.description(), "Quarterly audit");
        assert!(stored.end_date().is_some());
    }
}
