//! User service — application-layer orchestration
//!
//! Registration, login and the profile/inbox/outbox reads. HTTP handlers are
//! thin wrappers that pass the resolved identity in and map errors out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::credentials::CredentialStore;
use crate::application::guards::{require_authenticated, require_self};
use crate::domain::{
    AuthenticatedUser, DomainError, DomainResult, NewAccount, PublicProfile, ReceivedMessage,
    RegisterUserDto, RepositoryProvider, SentMessage, UserProfile,
};
use crate::infrastructure::crypto::jwt::{TokenClaims, TokenService};
use crate::infrastructure::crypto::password::MAX_PASSWORD_BYTES;

const MAX_USERNAME_CHARS: usize = 50;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub username: String,
    pub last_login_at: DateTime<Utc>,
}

/// Result of a successful registration: the new profile and a token for it.
#[derive(Debug, Clone)]
pub struct Registration {
    pub token: String,
    pub user: UserProfile,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    credentials: Arc<CredentialStore>,
    tokens: TokenService,
}

impl UserService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        credentials: Arc<CredentialStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            repos,
            credentials,
            tokens,
        }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Verify the password and return a token. Unknown user and wrong
    /// password both come back as `InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResult> {
        if !self.credentials.authenticate(username, password).await? {
            info!("Login rejected");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.issue_token(username)?;

        let last_login_at = self
            .repos
            .users()
            .update_last_login(username)
            .await?
            .ok_or_else(|| DomainError::user_not_found(username))?;

        info!(username = %username, "User logged in");
        Ok(AuthResult {
            token,
            username: username.to_string(),
            last_login_at,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Create the account and log it in. The returned profile never
    /// contains the password hash.
    pub async fn register(&self, dto: RegisterUserDto) -> DomainResult<Registration> {
        validate_registration(&dto)?;

        let password_hash = self.credentials.hash(&dto.password).await?;

        let user = self
            .repos
            .users()
            .insert_account(NewAccount {
                username: dto.username,
                password_hash,
                first_name: dto.first_name,
                last_name: dto.last_name,
                phone: dto.phone,
            })
            .await?;

        let token = self.issue_token(&user.username)?;

        info!(username = %user.username, "New user registered");
        Ok(Registration { token, user })
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Every user's public fields, ordered by username. Any signed-in user may list.
    pub async fn list_users(
        &self,
        identity: Option<&AuthenticatedUser>,
    ) -> DomainResult<Vec<PublicProfile>> {
        require_authenticated(identity)?;
        self.repos.users().list_profiles().await
    }

    /// Full profile, only for its owner.
    pub async fn get_profile(
        &self,
        identity: Option<&AuthenticatedUser>,
        username: &str,
    ) -> DomainResult<UserProfile> {
        require_self(identity, username)?;
        self.repos
            .users()
            .get_profile(username)
            .await?
            .ok_or_else(|| DomainError::user_not_found(username))
    }

    /// Messages received by `username`. An empty inbox is a not-found.
    pub async fn messages_to(
        &self,
        identity: Option<&AuthenticatedUser>,
        username: &str,
    ) -> DomainResult<Vec<ReceivedMessage>> {
        require_self(identity, username)?;
        let messages = self.repos.messages().messages_to(username).await?;
        non_empty(messages)
    }

    /// Messages sent by `username`. An empty outbox is a not-found.
    pub async fn messages_from(
        &self,
        identity: Option<&AuthenticatedUser>,
        username: &str,
    ) -> DomainResult<Vec<SentMessage>> {
        require_self(identity, username)?;
        let messages = self.repos.messages().messages_from(username).await?;
        non_empty(messages)
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn issue_token(&self, username: &str) -> DomainResult<String> {
        self.tokens
            .issue(&TokenClaims::new(username))
            .map_err(|e| DomainError::Crypto(e.to_string()))
    }
}

fn non_empty<T>(items: Vec<T>) -> DomainResult<Vec<T>> {
    if items.is_empty() {
        Err(DomainError::NotFound("No messages found".into()))
    } else {
        Ok(items)
    }
}

fn validate_registration(dto: &RegisterUserDto) -> DomainResult<()> {
    let username_chars = dto.username.chars().count();
    if username_chars == 0 || username_chars > MAX_USERNAME_CHARS {
        return Err(DomainError::Validation(format!(
            "username: must be 1-{} characters",
            MAX_USERNAME_CHARS
        )));
    }
    if dto.username.chars().any(char::is_whitespace) {
        return Err(DomainError::Validation(
            "username: must not contain whitespace".into(),
        ));
    }
    if dto.password.is_empty() || dto.password.len() > MAX_PASSWORD_BYTES {
        return Err(DomainError::Validation(format!(
            "password: must be 1-{} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    for (field, value) in [
        ("first_name", &dto.first_name),
        ("last_name", &dto.last_name),
        ("phone", &dto.phone),
    ] {
        if value.trim().is_empty() {
            return Err(DomainError::Validation(format!("{}: is required", field)));
        }
    }
    Ok(())
}
