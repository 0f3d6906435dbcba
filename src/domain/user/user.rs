use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::{Email, Role, Username};

/// A registered account
///
/// `password_hash` is a bcrypt hash and never leaves the service layer.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: Username,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a fresh id and creation timestamp
    pub fn new(username: Username, email: Email, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Partial update of a user's profile fields
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl UserChanges {
    /// Returns true if the changes would give the user a role other than
    /// `current`; an unrecognised role counts as a change
    pub fn changes_role(&self, current: Role) -> bool {
        self.role
            .as_deref()
            .is_some_and(|role| role != current.as_str())
    }

    /// Validates and applies the changes to `user`
    pub fn apply_to(self, user: &mut User) -> Result<(), crate::domain::DomainError> {
        if let Some(username) = self.username {
            user.username = Username::new(username)?;
        }
        if let Some(email) = self.email {
            user.email = Email::new(email)?;
        }
        if let Some(role) = self.role {
            user.role = role.parse()?;
        }
        Ok(())
    }
}
