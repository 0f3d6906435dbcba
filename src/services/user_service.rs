use uuid::Uuid;

use super::Repositories;
use crate::auth::Session;
use crate::domain::error::DomainError;
use crate::domain::user::{User, UserChanges};

/// User administration
#[derive(Clone)]
pub struct UserService {
    repos: Repositories,
}

impl UserService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// The signed-in user
    pub fn me(&self, session: &Session) -> Result<User, DomainError> {
        session.require_authenticated().cloned()
    }

    /// All users (Admin only)
    pub async fn list(&self, session: &Session) -> Result<Vec<User>, DomainError> {
        session.require_admin()?;
        self.repos.users.find_all().await
    }

    /// One user (Admin or the user themself)
    pub async fn get(&self, session: &Session, id: Uuid) -> Result<Option<User>, DomainError> {
        session.require_admin_or_self(id)?;
        self.repos.users.find_by_id(id).await
    }

    /// Updates username, email or role
    ///
    /// Users may edit their own profile; only Admins may change a role.
    pub async fn update(
        &self,
        session: &Session,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<User, DomainError> {
        let actor = session.require_admin_or_self(id)?;
        // a non-admin actor is the target, so its role is the current one
        if !actor.is_admin() && changes.changes_role(actor.role) {
            return Err(DomainError::NotAuthorized);
        }

        let mut user = self
            .repos
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::missing("User", id))?;
        changes.apply_to(&mut user)?;
        self.repos.users.update(&user).await?;

        tracing::info!(actor = %actor.id, user_id = %id, "user updated");
        Ok(user)
    }

    /// Deletes a user and pulls them from every team (Admin only)
    pub async fn delete(&self, session: &Session, id: Uuid) -> Result<bool, DomainError> {
        let actor = session.require_admin()?;
        if !self.repos.users.delete(id).await? {
            return Err(DomainError::missing("User", id));
        }

        tracing::info!(actor = %actor.id, user_id = %id, "user deleted");
        Ok(true)
    }
}
