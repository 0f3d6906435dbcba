// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory;
pub mod postgres_project_repository;
pub mod postgres_team_repository;
pub mod postgres_user_repository;

pub use in_memory::{
    InMemoryProjectRepository, InMemoryStore, InMemoryTeamRepository, InMemoryUserRepository,
};
pub use postgres_project_repository::PostgresProjectRepository;
pub use postgres_team_repository::PostgresTeamRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::error::DomainError;

/// Maps a SQLx error to a domain error
///
/// Unique violations become `Conflict` with a message naming the field;
/// everything else becomes `Storage` prefixed with `context`.
pub(crate) fn map_sqlx_error(err: sqlx::Error, context: &str) -> DomainError {
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() {
            let message = match db.constraint() {
                Some("users_email_key") => "Email is already registered",
                Some("users_username_key") => "Username is already taken",
                Some("teams_name_key") => "A team with that name already exists",
                _ => "Duplicate value",
            };
            return DomainError::conflict(message);
        }
    }
    tracing::error!(error = %err, "{}", context);
    DomainError::storage(format!("{}: {}", context, err))
}
