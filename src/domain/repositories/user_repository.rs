use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::user::User;

/// Repository trait for User accounts
///
/// Implementations report duplicate usernames or emails as
/// `DomainError::Conflict`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn create(&self, user: &User) -> Result<(), DomainError>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find the users with the given IDs, in the order of `ids`; unknown IDs are skipped
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError>;

    /// List every user, oldest first
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// Overwrite an existing user; `NotFound` if it no longer exists
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    /// Delete a user and pull it from every team's member set
    ///
    /// Returns false when no such user existed.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

