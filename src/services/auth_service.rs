use chrono::Utc;
use std::sync::Arc;

use crate::auth::cookie::{cleared_cookie, session_cookie};
use crate::auth::jwt::{create_token, verify_token};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::Session;
use crate::config::AuthSettings;
use crate::domain::error::DomainError;
use crate::domain::repositories::UserRepository;
use crate::domain::user::{Email, Password, Role, User, Username};

/// Registration form
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// Result of a successful register or login
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub token: String,
    pub user: User,
}

/// Issues and resolves session tokens
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, settings: AuthSettings) -> Self {
        Self { users, settings }
    }

    /// Resolves a raw token to a session
    ///
    /// Never fails: a missing, invalid or expired token, or one whose user
    /// has since been deleted, yields `Session::Anonymous`.
    pub async fn authenticate(&self, token: Option<&str>) -> Session {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Session::Anonymous;
        };

        let claims = match verify_token(token, &self.settings.jwt_secret) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "rejected session token");
                return Session::Anonymous;
            }
        };

        match self.users.find_by_id(claims.sub).await {
            Ok(Some(user)) => Session::Authenticated(user),
            Ok(None) => {
                tracing::debug!(user_id = %claims.sub, "session token for unknown user");
                Session::Anonymous
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load session user");
                Session::Anonymous
            }
        }
    }

    /// Creates an account and signs the new user in
    ///
    /// Fails with `User already exists` when the email is taken.
    pub async fn register(&self, form: Registration) -> Result<AuthOutcome, DomainError> {
        let username = Username::new(&form.username)?;
        let email = Email::new(form.email)?;
        let password = Password::new(&form.password)?;
        let role = match form.role.as_deref() {
            Some(role) => role.parse()?,
            None => Role::default(),
        };

        if self.users.find_by_email(email.as_str()).await?.is_some() {
            return Err(DomainError::conflict("User already exists"));
        }

        let password_hash = hash_password(password.expose(), self.settings.bcrypt_cost)
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))?;

        let user = User::new(username, email, password_hash, role);
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user registered");

        let token = self.issue_token(&user)?;
        Ok(AuthOutcome { token, user })
    }

    /// Checks credentials and issues a token
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash).map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "stored password hash is unreadable");
            DomainError::InvalidCredentials
        })?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "user logged in");
        let token = self.issue_token(&user)?;
        Ok(AuthOutcome { token, user })
    }

    /// `Set-Cookie` value carrying `token`
    pub fn session_cookie(&self, token: &str) -> String {
        session_cookie(
            token,
            Utc::now() + self.settings.cookie_ttl,
            self.settings.secure_cookies,
        )
    }

    /// `Set-Cookie` value that clears the session
    pub fn logout_cookie(&self) -> String {
        cleared_cookie(Utc::now())
    }

    fn issue_token(&self, user: &User) -> Result<String, DomainError> {
        create_token(user.id, &self.settings.jwt_secret, self.settings.jwt_ttl)
            .map_err(|e| DomainError::internal(format!("Failed to create token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::InMemoryStore;
    use chrono::Duration;

    fn service() -> AuthService {
        let store = InMemoryStore::new();
        AuthService::new(
            Arc::new(store.user_repository()),
            AuthSettings {
                jwt_secret: "unit-test-secret".to_string(),
                bcrypt_cost: 4,
                ..Default::default()
            },
        )
    }

    fn form(username: &str, email: &str) -> Registration {
        Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn register_defaults_to_member_and_issues_token() {
        let auth = service();
        let outcome = auth.register(form("alice", "alice@example.com")).await.unwrap();

        assert_eq!(outcome.user.role, Role::Member);
        assert_ne!(outcome.user.password_hash, "secret123");

        let session = auth.authenticate(Some(&outcome.token)).await;
        assert_eq!(session.user().unwrap().id, outcome.user.id);
    }

    #[tokio::test]
    async fn duplicate_email_creates_no_identity() {
        let auth = service();
        auth.register(form("alice", "alice@example.com")).await.unwrap();

        let err = auth
            .register(form("alice2", "alice@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User already exists");
        assert_eq!(auth.users.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn register_validates_fields() {
        let auth = service();
        assert!(auth.register(form("al", "al@example.com")).await.is_err());
        assert!(auth.register(form("alice", "nope")).await.is_err());

        let mut short = form("alice", "alice@example.com");
        short.password = "123".to_string();
        assert!(auth.register(short).await.is_err());

        let mut bad_role = form("alice", "alice@example.com");
        bad_role.role = Some("Owner".to_string());
        assert!(auth.register(bad_role).await.is_err());

        assert!(auth.users.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let auth = service();
        auth.register(form("alice", "alice@example.com")).await.unwrap();

        let wrong_password = auth.login("alice@example.com", "wrong-pass").await.unwrap_err();
        let unknown_email = auth.login("bob@example.com", "secret123").await.unwrap_err();

        assert_eq!(wrong_password, unknown_email);
        assert_eq!(wrong_password.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn login_with_correct_password() {
        let auth = service();
        let registered = auth.register(form("alice", "alice@example.com")).await.unwrap();

        let outcome = auth.login("alice@example.com", "secret123").await.unwrap();
        assert_eq!(outcome.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn bad_tokens_resolve_to_anonymous() {
        let auth = service();
        let outcome = auth.register(form("alice", "alice@example.com")).await.unwrap();

        assert!(auth.authenticate(None).await.user().is_none());
        assert!(auth.authenticate(Some("")).await.user().is_none());
        assert!(auth.authenticate(Some("garbage")).await.user().is_none());

        let foreign = create_token(outcome.user.id, "other-secret", Duration::hours(1)).unwrap();
        assert!(auth.authenticate(Some(&foreign)).await.user().is_none());

        let expired =
            create_token(outcome.user.id, "unit-test-secret", Duration::minutes(-5)).unwrap();
        assert!(auth.authenticate(Some(&expired)).await.user().is_none());
    }

    #[tokio::test]
    async fn token_of_deleted_user_is_anonymous() {
        let auth = service();
        let outcome = auth.register(form("alice", "alice@example.com")).await.unwrap();
        auth.users.delete(outcome.user.id).await.unwrap();

        assert!(auth.authenticate(Some(&outcome.token)).await.user().is_none());
    }

    #[test]
    fn cookies() {
        let auth = service();
        let cookie = auth.session_cookie("abc");
        assert!(cookie.starts_with("token=abc;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));
        assert!(auth.logout_cookie().starts_with("token=none;"));
    }
}
