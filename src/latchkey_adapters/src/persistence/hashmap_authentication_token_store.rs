use std::sync::Arc;

use chrono::{Duration, Utc};
use dashmap::DashMap;
use latchkey_core::{
    AuthenticationToken, AuthenticationTokenStore, AuthenticationTokenStoreError, Email,
    TokenHash, User, UserId, UserStore, UserStoreError, is_expired,
};

use super::HashMapUserStore;

/// Session tokens keyed by hash, resolved against a `HashMapUserStore`.
#[derive(Clone)]
pub struct HashMapAuthenticationTokenStore {
    tokens: Arc<DashMap<TokenHash, AuthenticationToken>>,
    users: HashMapUserStore,
    time_to_live: Duration,
}

impl HashMapAuthenticationTokenStore {
    pub fn new(users: HashMapUserStore, time_to_live: Duration) -> Self {
        Self {
            tokens: Arc::new(DashMap::new()),
            users,
            time_to_live,
        }
    }

    pub fn count_for(&self, user_id: UserId) -> usize {
        self.tokens
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .count()
    }
}

#[async_trait::async_trait]
impl AuthenticationTokenStore for HashMapAuthenticationTokenStore {
    fn time_to_live(&self) -> Duration {
        self.time_to_live
    }

    async fn insert(
        &self,
        token: &AuthenticationToken,
    ) -> Result<(), AuthenticationTokenStoreError> {
        self.tokens.insert(token.hash, token.clone());
        Ok(())
    }

    async fn verify(&self, plaintext: &str) -> Result<User, AuthenticationTokenStoreError> {
        let hash = TokenHash::of(plaintext);
        // Copy out before awaiting so no shard lock is held across the await.
        let (expiry, user_id) = self
            .tokens
            .get(&hash)
            .map(|entry| (entry.expiry, entry.user_id))
            .ok_or(AuthenticationTokenStoreError::TokenNotFound)?;

        if is_expired(expiry, Utc::now()) {
            return Err(AuthenticationTokenStoreError::TokenExpired);
        }

        match self.users.get_by_id(user_id).await {
            Ok(user) => Ok(user),
            Err(UserStoreError::UserNotFound) => Err(AuthenticationTokenStoreError::TokenNotFound),
            Err(e) => Err(AuthenticationTokenStoreError::Fatal(e.to_string())),
        }
    }

    async fn purge_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<(), AuthenticationTokenStoreError> {
        self.tokens.retain(|_, token| token.user_id != user_id);
        Ok(())
    }

    async fn purge_by_email(&self, email: &Email) -> Result<(), AuthenticationTokenStoreError> {
        let ids = self.users.ids_by_email(email).await;
        self.tokens.retain(|_, token| !ids.contains(&token.user_id));
        Ok(())
    }
}
