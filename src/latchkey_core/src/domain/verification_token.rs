use chrono::{DateTime, Utc};

use super::{
    email::Email,
    scope::TokenScope,
    token::{Token, TokenHash},
    user::UserId,
};

/// Persisted form of a verification token: the hash plus what it is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationToken {
    pub hash: TokenHash,
    pub expiry: DateTime<Utc>,
    pub scope: TokenScope,
    pub email: Email,
    pub owner: Option<UserId>,
}

impl VerificationToken {
    pub fn new(token: &Token, scope: TokenScope, email: Email, owner: Option<UserId>) -> Self {
        Self {
            hash: token.hash(),
            expiry: token.expiry(),
            scope,
            email,
            owner,
        }
    }

    /// Whether this row is the one addressed by (hash, scope, email, owner).
    pub fn matches(
        &self,
        hash: &TokenHash,
        scope: TokenScope,
        email: &Email,
        owner: Option<UserId>,
    ) -> bool {
        self.hash == *hash && self.is_for(scope, email, owner)
    }

    /// Whether this row belongs to the (scope, email, owner) subject.
    pub fn is_for(&self, scope: TokenScope, email: &Email, owner: Option<UserId>) -> bool {
        self.scope == scope && self.email == *email && self.owner == owner
    }
}
