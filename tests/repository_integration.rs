//! Integration tests for the PostgreSQL repositories
//!
//! These tests verify that the repository implementations correctly interact
//! with the database, including unique constraints, member ordering and the
//! cascading deletes. They run only when DATABASE_URL points at a database
//! and return early otherwise.

use teamboard_api::domain::error::DomainError;
use teamboard_api::domain::project::{NewProject, Project, ProjectChanges, ProjectStatus};
use teamboard_api::domain::repositories::{
    ProjectRepository, StatusUpdate, TeamRepository, UserRepository,
};
use teamboard_api::domain::team::{NewTeam, Team, TeamChanges};
use teamboard_api::domain::user::{Email, Role, User, Username};
use teamboard_api::infrastructure::database;
use teamboard_api::infrastructure::repositories::{
    PostgresProjectRepository, PostgresTeamRepository, PostgresUserRepository,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Set up a migrated connection pool, or None when no database is configured
async fn setup_test_db() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    Some(
        database::connect(&database_url, 2)
            .await
            .expect("Failed to connect to test database"),
    )
}

/// Create a user with a unique name so tests can share a database
async fn create_test_user(pool: &PgPool, role: Role) -> User {
    let tag = Uuid::new_v4().simple().to_string();
    let user = User::new(
        Username::new(format!("user_{}", &tag[..12])).unwrap(),
        Email::new(format!("{}@example.com", &tag[..12])).unwrap(),
        "$2b$04$not.a.real.hash".to_string(),
        role,
    );
    PostgresUserRepository::new(pool.clone())
        .create(&user)
        .await
        .expect("Failed to create test user");
    user
}

fn test_team(members: Vec<Uuid>) -> Team {
    Team::new(NewTeam {
        name: format!("Team {}", &Uuid::new_v4().simple().to_string()[..12]),
        description: "Integration test team".to_string(),
        members,
        ..Default::default()
    })
    .unwrap()
}

fn test_project(team_id: Uuid) -> Project {
    Project::new(NewProject {
        name: "Audit".to_string(),
        description: "Integration test project".to_string(),
        team_id,
        start_date: "2025-01-01".to_string(),
        end_date: Some("2025-03-31".to_string()),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_user_create_and_find() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let repo = PostgresUserRepository::new(pool.clone());
    let user = create_test_user(&pool, Role::Admin).await;

    let by_id = repo.find_by_id(user.id).await.unwrap().expect("user by id");
    assert_eq!(by_id.username, user.username);
    assert_eq!(by_id.role, Role::Admin);

    let by_email = repo
        .find_by_email(user.email.as_str())
        .await
        .unwrap()
        .expect("user by email");
    assert_eq!(by_email.id, user.id);

    repo.delete(user.id).await.unwrap();
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let repo = PostgresUserRepository::new(pool.clone());
    let user = create_test_user(&pool, Role::Member).await;

    let twin = User::new(
        Username::new(format!("twin_{}", &Uuid::new_v4().simple().to_string()[..8])).unwrap(),
        user.email.clone(),
        "hash".to_string(),
        Role::Member,
    );
    let err = repo.create(&twin).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));

    repo.delete(user.id).await.unwrap();
}

#[tokio::test]
async fn test_team_members_keep_order() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let users = PostgresUserRepository::new(pool.clone());
    let teams = PostgresTeamRepository::new(pool.clone());
    let first = create_test_user(&pool, Role::Member).await;
    let second = create_test_user(&pool, Role::Member).await;

    let team = test_team(vec![second.id, first.id]);
    teams.create(&team).await.unwrap();

    let found = teams.find_by_id(team.id()).await.unwrap().expect("team");
    assert_eq!(found.members(), &[second.id, first.id]);

    let by_member = teams.find_by_member(first.id).await.unwrap();
    assert!(by_member.iter().any(|t| t.id() == team.id()));

    let patch = TeamChanges {
        members: Some(vec![first.id]),
        ..Default::default()
    }
    .validate()
    .unwrap();
    let patched = teams.patch(team.id(), &patch).await.unwrap().expect("team");
    assert_eq!(patched.members(), &[first.id]);
    assert_eq!(patched.name(), team.name());

    teams.delete(team.id()).await.unwrap();
    users.delete(first.id).await.unwrap();
    users.delete(second.id).await.unwrap();
}

#[tokio::test]
async fn test_deleting_user_removes_membership() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let users = PostgresUserRepository::new(pool.clone());
    let teams = PostgresTeamRepository::new(pool.clone());
    let keeper = create_test_user(&pool, Role::Member).await;
    let leaver = create_test_user(&pool, Role::Member).await;
    let team = test_team(vec![keeper.id, leaver.id]);
    teams.create(&team).await.unwrap();

    assert!(users.delete(leaver.id).await.unwrap());

    let found = teams.find_by_id(team.id()).await.unwrap().expect("team");
    assert_eq!(found.members(), &[keeper.id]);
    assert!(teams.find_by_member(leaver.id).await.unwrap().is_empty());

    teams.delete(team.id()).await.unwrap();
    users.delete(keeper.id).await.unwrap();
}

#[tokio::test]
async fn test_deleting_team_deletes_projects() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let teams = PostgresTeamRepository::new(pool.clone());
    let projects = PostgresProjectRepository::new(pool.clone());
    let team = test_team(vec![]);
    teams.create(&team).await.unwrap();
    let project = test_project(team.id());
    projects.create(&project).await.unwrap();

    let stored = projects.find_by_id(project.id()).await.unwrap().expect("project");
    assert_eq!(stored.status(), ProjectStatus::Pending);
    assert_eq!(stored.end_date(), project.end_date());

    assert!(teams.delete(team.id()).await.unwrap());

    assert!(projects.find_by_id(project.id()).await.unwrap().is_none());
    assert!(projects.find_by_team(team.id()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_project_requires_existing_team() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let projects = PostgresProjectRepository::new(pool);

    let err = projects.create(&test_project(Uuid::new_v4())).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_membership_changes_are_single_rows() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let users = PostgresUserRepository::new(pool.clone());
    let teams = PostgresTeamRepository::new(pool.clone());
    let first = create_test_user(&pool, Role::Member).await;
    let second = create_test_user(&pool, Role::Member).await;
    let team = test_team(vec![first.id]);
    teams.create(&team).await.unwrap();

    assert!(teams.add_member(team.id(), second.id).await.unwrap());
    assert!(!teams.add_member(team.id(), second.id).await.unwrap());
    let found = teams.find_by_id(team.id()).await.unwrap().expect("team");
    assert_eq!(found.members(), &[first.id, second.id]);

    assert!(teams.remove_member(team.id(), first.id).await.unwrap());
    assert!(!teams.remove_member(team.id(), first.id).await.unwrap());
    let found = teams.find_by_id(team.id()).await.unwrap().expect("team");
    assert_eq!(found.members(), &[second.id]);

    let ghost = Uuid::new_v4();
    assert_eq!(
        teams.add_member(team.id(), ghost).await.unwrap_err(),
        DomainError::missing("User", ghost)
    );
    let missing = Uuid::new_v4();
    assert_eq!(
        teams.add_member(missing, second.id).await.unwrap_err(),
        DomainError::missing("Team", missing)
    );
    assert!(teams.remove_member(missing, second.id).await.is_err());

    teams.delete(team.id()).await.unwrap();
    users.delete(first.id).await.unwrap();
    users.delete(second.id).await.unwrap();
}

#[tokio::test]
async fn test_project_patch_writes_only_given_fields() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let teams = PostgresTeamRepository::new(pool.clone());
    let projects = PostgresProjectRepository::new(pool.clone());
    let team = test_team(vec![]);
    teams.create(&team).await.unwrap();
    let project = test_project(team.id());
    projects.create(&project).await.unwrap();

    let rename = ProjectChanges {
        name: Some("Audit 2".to_string()),
        ..Default::default()
    }
    .validate()
    .unwrap();
    let stored = projects.patch(project.id(), &rename).await.unwrap().expect("project");
    assert_eq!(stored.name(), "Audit 2");
    assert_eq!(stored.description(), project.description());
    assert_eq!(stored.end_date(), project.end_date());

    let early_end = ProjectChanges {
        end_date: Some(Some("2024-01-01".to_string())),
        ..Default::default()
    }
    .validate()
    .unwrap();
    assert!(matches!(
        projects.patch(project.id(), &early_end).await,
        Err(DomainError::Validation { .. })
    ));

    let elsewhere = ProjectChanges {
        team_id: Some(Uuid::new_v4()),
        ..Default::default()
    }
    .validate()
    .unwrap();
    assert!(matches!(
        projects.patch(project.id(), &elsewhere).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(projects.patch(Uuid::new_v4(), &rename).await.unwrap().is_none());

    teams.delete(team.id()).await.unwrap();
}

#[tokio::test]
async fn test_project_status_update() {
    let Some(pool) = setup_test_db().await else {
        return;
    };
    let users = PostgresUserRepository::new(pool.clone());
    let teams = PostgresTeamRepository::new(pool.clone());
    let projects = PostgresProjectRepository::new(pool.clone());
    let member = create_test_user(&pool, Role::Member).await;
    let outsider = create_test_user(&pool, Role::Member).await;
    let team = test_team(vec![member.id]);
    teams.create(&team).await.unwrap();
    let project = test_project(team.id());
    projects.create(&project).await.unwrap();

    let outcome = projects
        .update_status(project.id(), ProjectStatus::InProgress, Some(member.id))
        .await
        .unwrap();
    assert!(matches!(outcome, StatusUpdate::Updated(p) if p.status() == ProjectStatus::InProgress));

    assert_eq!(
        projects
            .update_status(project.id(), ProjectStatus::Completed, Some(outsider.id))
            .await
            .unwrap(),
        StatusUpdate::NotMember
    );
    assert!(matches!(
        projects
            .update_status(project.id(), ProjectStatus::Completed, None)
            .await
            .unwrap(),
        StatusUpdate::Updated(_)
    ));
    assert_eq!(
        projects
            .update_status(Uuid::new_v4(), ProjectStatus::Completed, None)
            .await
            .unwrap(),
        StatusUpdate::Missing
    );

    let stored = projects.find_by_id(project.id()).await.unwrap().expect("project");
    assert_eq!(stored.status(), ProjectStatus::Completed);
    assert_eq!(stored.name(), project.name());

    teams.delete(team.id()).await.unwrap();
    users.delete(member.id).await.unwrap();
    users.delete(outsider.id).await.unwrap();
}
