// Application services
// One service per aggregate: capability checks, validation, cascades and
// relationship population, on top of the repository ports

pub mod auth_service;
pub mod populate;
pub mod project_service;
pub mod team_service;
pub mod user_service;

pub use auth_service::{AuthOutcome, AuthService, Registration};
pub use populate::{ProjectDetails, TeamDetails};
pub use project_service::ProjectService;
pub use team_service::TeamService;
pub use user_service::UserService;

use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::Session;
use crate::config::{AppConfig, ReadAccess};
use crate::domain::error::DomainError;
use crate::domain::repositories::{ProjectRepository, TeamRepository, UserRepository};
use crate::infrastructure::repositories::{
    InMemoryStore, PostgresProjectRepository, PostgresTeamRepository, PostgresUserRepository,
};

/// The three repositories every service draws from
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub projects: Arc<dyn ProjectRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            teams: Arc::new(PostgresTeamRepository::new(pool.clone())),
            projects: Arc::new(PostgresProjectRepository::new(pool)),
        }
    }

    pub fn in_memory(store: &InMemoryStore) -> Self {
        Self {
            users: Arc::new(store.user_repository()),
            teams: Arc::new(store.team_repository()),
            projects: Arc::new(store.project_repository()),
        }
    }
}

/// Every service the API layer dispatches to
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub teams: TeamService,
    pub projects: ProjectService,
}

impl Services {
    pub fn new(repos: Repositories, config: &AppConfig) -> Self {
        Self {
            auth: AuthService::new(repos.users.clone(), config.auth.clone()),
            users: UserService::new(repos.clone()),
            teams: TeamService::new(repos.clone(), config.read_access),
            projects: ProjectService::new(repos, config.read_access),
        }
    }
}

/// Applies the configured read policy for team and project queries
fn authorize_read(read_access: ReadAccess, session: &Session) -> Result<(), DomainError> {
    match read_access {
        ReadAccess::Public => Ok(()),
        ReadAccess::Authenticated => session.require_authenticated().map(|_| ()),
    }
}
