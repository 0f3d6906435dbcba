// Per-request session and the capability checks every protected operation uses

use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::user::User;

/// Identity behind a request
///
/// A missing, invalid or expired token resolves to `Anonymous`; it is the
/// capability checks below that turn that into an error.
#[derive(Debug, Clone, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(user) => Some(user),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    /// Fails with `Not authenticated` for anonymous sessions
    pub fn require_authenticated(&self) -> Result<&User, DomainError> {
        self.user().ok_or(DomainError::NotAuthenticated)
    }

    /// Fails with `Not authorized` unless the user is an Admin
    pub fn require_admin(&self) -> Result<&User, DomainError> {
        match self.user() {
            Some(user) if user.is_admin() => Ok(user),
            _ => Err(DomainError::NotAuthorized),
        }
    }

    /// Fails with `Not authorized` unless the user is an Admin or is `target`
    pub fn require_admin_or_self(&self, target: Uuid) -> Result<&User, DomainError> {
        match self.user() {
            Some(user) if user.is_admin() || user.id == target => Ok(user),
            _ => Err(DomainError::NotAuthorized),
        }
    }
}
