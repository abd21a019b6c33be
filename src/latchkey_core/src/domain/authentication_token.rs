use chrono::{DateTime, Utc};

use super::{
    token::{Token, TokenHash},
    user::UserId,
};

/// Persisted form of a session token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticationToken {
    pub hash: TokenHash,
    pub expiry: DateTime<Utc>,
    pub user_id: UserId,
}

impl AuthenticationToken {
    pub fn new(token: &Token, user_id: UserId) -> Self {
        Self {
            hash: token.hash(),
            expiry: token.expiry(),
            user_id,
        }
    }
}
