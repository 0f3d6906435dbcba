use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use super::map_sqlx_error;
use crate::domain::error::DomainError;
use crate::domain::repositories::TeamRepository;
use crate::domain::team::{Team, TeamPatch};

const TEAM_COLUMNS: &str =
    "t.id, t.name, t.description, t.status, t.team_slogan, t.expertise_level, t.created_date";

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: Uuid,
    name: String,
    description: String,
    status: String,
    team_slogan: Option<String>,
    expertise_level: String,
    created_date: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    team_id: Uuid,
    user_id: Uuid,
}

impl TeamRow {
    fn into_team(self, members: Vec<Uuid>) -> Result<Team, DomainError> {
        let id = self.id;
        let invalid = |e: DomainError| DomainError::storage(format!("Invalid team row {}: {}", id, e));
        Ok(Team::from_persistence(
            self.id,
            self.name,
            self.description,
            members,
            self.status.parse().map_err(invalid)?,
            self.team_slogan,
            self.expertise_level.parse().map_err(invalid)?,
            self.created_date,
        ))
    }
}

/// PostgreSQL implementation of TeamRepository
///
/// Members live in `team_members` ordered by `position`. Projects and
/// membership rows reference teams with `ON DELETE CASCADE`.
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Creates a new PostgresTeamRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads member lists for the given rows and assembles teams
    async fn hydrate(&self, rows: Vec<TeamRow>) -> Result<Vec<Team>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let member_rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT team_id, user_id
            FROM team_members
            WHERE team_id = ANY($1)
            ORDER BY team_id, position, user_id
            "#,
        )
        .bind(ids.as_slice())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to load team members"))?;

        let mut members: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in member_rows {
            members.entry(row.team_id).or_default().push(row.user_id);
        }

        rows.into_iter()
            .map(|row| {
                let team_members = members.remove(&row.id).unwrap_or_default();
                row.into_team(team_members)
            })
            .collect()
    }

    async fn team_exists(&self, id: Uuid) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM teams WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to check team"))
    }
}

/// Replaces a team's member list inside the caller's transaction
async fn write_members(
    conn: &mut PgConnection,
    team_id: Uuid,
    members: &[Uuid],
) -> Result<(), DomainError> {
    sqlx::query("DELETE FROM team_members WHERE team_id = $1")
        .bind(team_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to clear team members"))?;

    if members.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO team_members (team_id, user_id, position)
        SELECT $1, m.user_id, m.ord::INTEGER
        FROM UNNEST($2::UUID[]) WITH ORDINALITY AS m(user_id, ord)
        "#,
    )
    .bind(team_id)
    .bind(members)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_member_error(e, team_id, None, "Failed to write team members"))?;

    Ok(())
}

/// Turns a dangling membership reference into `NotFound`
fn map_member_error(
    err: sqlx::Error,
    team_id: Uuid,
    user_id: Option<Uuid>,
    context: &str,
) -> DomainError {
    match err {
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            match (db.constraint(), user_id) {
                (Some("team_members_team_id_fkey"), _) => DomainError::missing("Team", team_id),
                (_, Some(user_id)) => DomainError::missing("User", user_id),
                (_, None) => DomainError::not_found("Team members must reference existing users"),
            }
        }
        other => map_sqlx_error(other, context),
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn create(&self, team: &Team) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to begin transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO teams (
                id, name, description, status, team_slogan, expertise_level, created_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(team.id())
        .bind(team.name())
        .bind(team.description())
        .bind(team.status().as_str())
        .bind(team.team_slogan())
        .bind(team.expertise_level().as_str())
        .bind(team.created_date())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to create team"))?;

        write_members(&mut *tx, team.id(), team.members()).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to commit team"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "SELECT {} FROM teams t WHERE t.id = $1",
            TEAM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to find team by id"))?;

        Ok(self.hydrate(row.into_iter().collect()).await?.pop())
    }

    async fn find_all(&self) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query_as::<_, TeamRow>(&format!(
            "SELECT {} FROM teams t ORDER BY t.created_date, t.id",
            TEAM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to list teams"))?;

        self.hydrate(rows).await
    }

    async fn find_by_member(&self, user_id: Uuid) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query_as::<_, TeamRow>(&format!(
            r#"
            SELECT {}
            FROM teams t
            JOIN team_members m ON m.team_id = t.id
            WHERE m.user_id = $1
            ORDER BY t.created_date, t.id
            "#,
            TEAM_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to find teams by member"))?;

        self.hydrate(rows).await
    }

    async fn patch(&self, id: Uuid, patch: &TeamPatch) -> Result<Option<Team>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to begin transaction"))?;

        // absent fields keep the stored value
        let result = sqlx::query(
            r#"
            UPDATE teams
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                team_slogan = CASE WHEN $5 THEN $6 ELSE team_slogan END,
                expertise_level = COALESCE($7, expertise_level)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.team_slogan.is_some())
        .bind(patch.team_slogan.as_ref().and_then(|s| s.as_deref()))
        .bind(patch.expertise_level.map(|l| l.as_str()))
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error(e, "Failed to update team"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(ref members) = patch.members {
            write_members(&mut *tx, id, members).await?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to commit team"))?;

        self.find_by_id(id).await
    }

    async fn add_member(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO team_members (team_id, user_id, position)
            SELECT $1, $2, COALESCE(MAX(position), 0) + 1
            FROM team_members
            WHERE team_id = $1
            ON CONFLICT (team_id, user_id) DO NOTHING
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_member_error(e, team_id, Some(user_id), "Failed to add team member"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_member(&self, team_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to remove team member"))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        if !self.team_exists(team_id).await? {
            return Err(DomainError::missing("Team", team_id));
        }
        Ok(false)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Failed to delete team"))?;

        Ok(result.rows_affected() > 0)
    }
}
