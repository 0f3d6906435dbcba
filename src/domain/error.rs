use thiserror::Error;

/// Errors raised by the domain, the repositories and the services
///
/// The display string of every variant is the message returned to API
/// clients, so variants carry the final wording rather than a prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not authorized")]
    NotAuthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Not-found error in the `<Entity> with ID <id> not found` form
    pub fn missing(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::not_found(format!("{} with ID {} not found", entity, id))
    }

    /// Machine-readable code exposed to API clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated | Self::InvalidCredentials => "UNAUTHENTICATED",
            Self::NotAuthorized => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation { .. } => "BAD_USER_INPUT",
            Self::Conflict { .. } => "CONFLICT",
            Self::Storage { .. } | Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_messages_are_generic() {
        assert_eq!(DomainError::NotAuthenticated.to_string(), "Not authenticated");
        assert_eq!(DomainError::NotAuthorized.to_string(), "Not authorized");
        assert_eq!(DomainError::InvalidCredentials.to_string(), "Invalid credentials");
    }

    #[test]
    fn missing_formats_entity_and_id() {
        let err = DomainError::missing("Team", "abc");
        assert_eq!(err.to_string(), "Team with ID abc not found");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn codes() {
        assert_eq!(DomainError::validation("x").code(), "BAD_USER_INPUT");
        assert_eq!(DomainError::conflict("x").code(), "CONFLICT");
        assert_eq!(DomainError::storage("x").code(), "INTERNAL_SERVER_ERROR");
        assert_eq!(DomainError::InvalidCredentials.code(), "UNAUTHENTICATED");
    }
}
