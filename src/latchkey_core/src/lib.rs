pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    authentication_token::AuthenticationToken,
    email::{Email, EmailError},
    password::{Password, PasswordError, PasswordHash},
    scope::TokenScope,
    token::{TOKEN_PLAINTEXT_LEN, Token, TokenError, TokenHash, is_expired},
    user::{INITIAL_USER_VERSION, User, UserId},
    verification_token::VerificationToken,
};

pub use ports::{
    repositories::{
        AuthenticationTokenStore, AuthenticationTokenStoreError, UserStore, UserStoreError,
        VerificationTokenStore, VerificationTokenStoreError, missing_required_owner,
    },
    services::{EmailClient, Notification},
};
