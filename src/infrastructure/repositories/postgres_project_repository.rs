use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_sqlx_error;
use crate::domain::error::DomainError;
use crate::domain::project::{Project, ProjectPatch, ProjectStatus};
use crate::domain::repositories::{ProjectRepository, StatusUpdate};

const PROJECT_COLUMNS: &str =
    "id, name, description, team_id, status, start_date, end_date, created_at";

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    name: String,
    description: String,
    team_id: Uuid,
    status: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = DomainError;

    fn try_from(r: ProjectRow) -> Result<Self, Self::Error> {
        let status = r
            .status
            .parse()
            .map_err(|e| DomainError::storage(format!("Invalid project row {}: {}", r.id, e)))?;
        Ok(Project::from_persistence(
            r.id,
            r.name,
            r.description,
            r.team_id,
            status,
            r.start_date,
            r.end_date,
            r.created_at,
        ))
    }
}

/// Maps a write error
///
/// A dangling team reference becomes `NotFound` and the date-order check
/// becomes the same `Validation` error the domain raises.
fn map_write_error(err: sqlx::Error, team_id: Uuid, context: &str) -> DomainError {
    match err {
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            DomainError::missing("Team", team_id)
        }
        sqlx::Error::Database(ref db) if db.constraint() == Some("projects_date_order") => {
            DomainError::validation("End date cannot be before start date")
        }
        other => map_sqlx_error(other, context),
    }
}

/// PostgreSQL implementation of ProjectRepository
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a new PostgresProjectRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn create(&self, project: &Project) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO projects (
                id, name, description, team_id, status, start_date, end_date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(project.id())
        .bind(project.name())
        .bind(project.description())
        .bind(project.team_id())
        .bind(project.status().as_str())
        .bind(project.start_date())
        .bind(project.end_date())
        .bind(project.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, project.team_id(), "Failed to create project"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, DomainError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {} FROM projects WHERE id = $1",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to find project by id"))?;

        row.map(Project::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Project>, DomainError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {} FROM projects ORDER BY created_at, id",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to list projects"))?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn find_by_team(&self, team_id: Uuid) -> Result<Vec<Project>, DomainError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {} FROM projects WHERE team_id = $1 ORDER BY created_at, id",
            PROJECT_COLUMNS
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to find projects by team"))?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn patch(
        &self,
        id: Uuid,
        patch: &ProjectPatch,
    ) -> Result<Option<Project>, DomainError> {
        // absent fields keep the stored value
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                team_id = COALESCE($4, team_id),
                start_date = COALESCE($5, start_date),
                end_date = CASE WHEN $6 THEN $7 ELSE end_date END,
                status = COALESCE($8, status)
            WHERE id = $1
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        ))
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.team_id)
        .bind(patch.start_date)
        .bind(patch.end_date.is_some())
        .bind(patch.end_date.flatten())
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(e, patch.team_id.unwrap_or_default(), "Failed to update project")
        })?;

        row.map(Project::try_from).transpose()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ProjectStatus,
        member: Option<Uuid>,
    ) -> Result<StatusUpdate, DomainError> {
        // membership is checked against the team the row has when written
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects
            SET status = $2
            WHERE id = $1
              AND ($3::UUID IS NULL
                   OR team_id IN (SELECT team_id FROM team_members WHERE user_id = $3))
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(member)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to update project status"))?;

        if let Some(row) = row {
            return Ok(StatusUpdate::Updated(Project::try_from(row)?));
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM projects WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to check project"))?;

        Ok(if exists {
            StatusUpdate::NotMember
        } else {
            StatusUpdate::Missing
        })
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to delete project"))?;

        Ok(result.rows_affected() > 0)
    }
}
