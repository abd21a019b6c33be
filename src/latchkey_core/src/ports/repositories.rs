use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;

use crate::domain::{
    authentication_token::AuthenticationToken,
    email::Email,
    password::Password,
    scope::TokenScope,
    token::{Token, TokenError},
    user::{User, UserId},
    verification_token::VerificationToken,
};

// UserStore port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User not found")]
    UserNotFound,
    #[error("Duplicate email")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Edit conflict")]
    EditConflict,
    #[error("Transient store failure: {0}")]
    Transient(String),
    #[error("Fatal store failure: {0}")]
    Fatal(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UserNotFound, Self::UserNotFound)
                | (Self::DuplicateEmail, Self::DuplicateEmail)
                | (Self::InvalidCredentials, Self::InvalidCredentials)
                | (Self::EditConflict, Self::EditConflict)
                | (Self::Transient(_), Self::Transient(_))
                | (Self::Fatal(_), Self::Fatal(_))
        )
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Hash `password` and insert a new user at the initial version.
    async fn create(&self, email: Email, password: Password) -> Result<User, UserStoreError>;

    /// Fails with `InvalidCredentials` whether the email is unknown or the
    /// password is wrong; both paths pay for a password verification.
    async fn get_for_credentials(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError>;

    async fn exists_by_email(&self, email: &Email) -> Result<bool, UserStoreError>;

    async fn get_by_id(&self, id: UserId) -> Result<User, UserStoreError>;

    /// Persist `user`'s email and password hash if the stored version still
    /// equals `expected_version`. Returns the new version.
    async fn update(&self, user: &User, expected_version: i32) -> Result<i32, UserStoreError>;
}

// VerificationTokenStore port trait and errors
#[derive(Debug, Error)]
pub enum VerificationTokenStoreError {
    #[error("Token not found")]
    TokenNotFound,
    #[error("Token expired")]
    TokenExpired,
    #[error("Transient store failure: {0}")]
    Transient(String),
    #[error("Fatal store failure: {0}")]
    Fatal(String),
}

impl PartialEq for VerificationTokenStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::TokenNotFound, Self::TokenNotFound)
                | (Self::TokenExpired, Self::TokenExpired)
                | (Self::Transient(_), Self::Transient(_))
                | (Self::Fatal(_), Self::Fatal(_))
        )
    }
}

impl From<TokenError> for VerificationTokenStoreError {
    fn from(error: TokenError) -> Self {
        Self::Fatal(error.to_string())
    }
}

/// Scoped one-time tokens proving control of an email address.
///
/// Duplicate suppression is the caller's job: `new_token` does not look at
/// what is already stored, so two racing requests can both insert a row.
#[async_trait]
pub trait VerificationTokenStore: Send + Sync {
    fn time_to_live(&self) -> Duration;

    async fn insert(&self, token: &VerificationToken) -> Result<(), VerificationTokenStoreError>;

    async fn new_token(
        &self,
        scope: TokenScope,
        email: &Email,
        owner: Option<UserId>,
    ) -> Result<Token, VerificationTokenStoreError> {
        let token = Token::generate(self.time_to_live())?;
        self.insert(&VerificationToken::new(&token, scope, email.clone(), owner))
            .await?;
        Ok(token)
    }

    /// Expired but unpurged rows still count.
    async fn exists(
        &self,
        scope: TokenScope,
        email: &Email,
        owner: Option<UserId>,
    ) -> Result<bool, VerificationTokenStoreError>;

    async fn verify(
        &self,
        plaintext: &str,
        scope: TokenScope,
        email: &Email,
        owner: Option<UserId>,
    ) -> Result<(), VerificationTokenStoreError>;

    async fn purge_by_email(&self, email: &Email) -> Result<(), VerificationTokenStoreError>;

    async fn purge_by_user_id(&self, user_id: UserId) -> Result<(), VerificationTokenStoreError>;
}

/// Owner-bound scopes never match a lookup that carries no owner.
pub fn missing_required_owner(scope: TokenScope, owner: Option<UserId>) -> bool {
    scope.requires_owner() && owner.is_none()
}

// AuthenticationTokenStore port trait and errors
#[derive(Debug, Error)]
pub enum AuthenticationTokenStoreError {
    #[error("Token not found")]
    TokenNotFound,
    #[error("Token expired")]
    TokenExpired,
    #[error("Transient store failure: {0}")]
    Transient(String),
    #[error("Fatal store failure: {0}")]
    Fatal(String),
}

impl PartialEq for AuthenticationTokenStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::TokenNotFound, Self::TokenNotFound)
                | (Self::TokenExpired, Self::TokenExpired)
                | (Self::Transient(_), Self::Transient(_))
                | (Self::Fatal(_), Self::Fatal(_))
        )
    }
}

impl From<TokenError> for AuthenticationTokenStoreError {
    fn from(error: TokenError) -> Self {
        Self::Fatal(error.to_string())
    }
}

/// Bearer session tokens. A user may hold any number at once.
#[async_trait]
pub trait AuthenticationTokenStore: Send + Sync {
    fn time_to_live(&self) -> Duration;

    async fn insert(&self, token: &AuthenticationToken)
    -> Result<(), AuthenticationTokenStoreError>;

    async fn new_token(&self, user_id: UserId) -> Result<Token, AuthenticationTokenStoreError> {
        let token = Token::generate(self.time_to_live())?;
        self.insert(&AuthenticationToken::new(&token, user_id)).await?;
        Ok(token)
    }

    /// Resolve a presented bearer token to the user it belongs to.
    async fn verify(&self, plaintext: &str) -> Result<User, AuthenticationTokenStoreError>;

    async fn purge_by_user_id(&self, user_id: UserId)
    -> Result<(), AuthenticationTokenStoreError>;

    async fn purge_by_email(&self, email: &Email) -> Result<(), AuthenticationTokenStoreError>;
}
