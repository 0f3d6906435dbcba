use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\w+([\.-]?\w+)*@\w+([\.-]?\w+)*(\.\w{2,3})+$").expect("email pattern compiles")
});

/// Email value object representing a valid email address
///
/// # Invariants
/// - Local part and domain are word characters optionally separated by `.` or `-`
/// - Ends with a 2-3 character top-level domain
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use teamboard_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new("test@example.com").expect("valid email");
    /// assert_eq!(email.as_str(), "test@example.com");
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, DomainError> {
        let email = email.into();
        if email.is_empty() {
            return Err(DomainError::validation("Please add an email"));
        }
        if !EMAIL_PATTERN.is_match(&email) {
            return Err(DomainError::validation("Please add a valid email"));
        }
        Ok(Email(email))
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Username value object (trimmed, at least 3 characters)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub const MIN_LENGTH: usize = 3;

    pub fn new(username: impl AsRef<str>) -> Result<Self, DomainError> {
        let username = username.as_ref().trim();
        if username.is_empty() {
            return Err(DomainError::validation("Please add a username"));
        }
        if username.chars().count() < Self::MIN_LENGTH {
            return Err(DomainError::validation(format!(
                "Username must be at least {} characters",
                Self::MIN_LENGTH
            )));
        }
        Ok(Username(username.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Plaintext password as submitted by a client; only ever hashed
pub struct Password<'a>(&'a str);

impl<'a> Password<'a> {
    pub const MIN_LENGTH: usize = 6;

    pub fn new(password: &'a str) -> Result<Self, DomainError> {
        if password.is_empty() {
            return Err(DomainError::validation("Please add a password"));
        }
        if password.chars().count() < Self::MIN_LENGTH {
            return Err(DomainError::validation(format!(
                "Password must be at least {} characters",
                Self::MIN_LENGTH
            )));
        }
        Ok(Password(password))
    }

    pub fn expose(&self) -> &'a str {
        self.0
    }
}

/// Access role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[default]
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Member => "Member",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Member" => Ok(Role::Member),
            other => Err(DomainError::validation(format!(
                "`{}` is not a valid role (expected Admin or Member)",
                other
            ))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
