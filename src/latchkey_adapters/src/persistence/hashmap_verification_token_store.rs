use std::sync::Arc;

use chrono::{Duration, Utc};
use latchkey_core::{
    Email, TokenHash, TokenScope, UserId, VerificationToken, VerificationTokenStore,
    VerificationTokenStoreError, is_expired, missing_required_owner,
};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct HashMapVerificationTokenStore {
    tokens: Arc<RwLock<Vec<VerificationToken>>>,
    time_to_live: Duration,
}

impl HashMapVerificationTokenStore {
    pub fn new(time_to_live: Duration) -> Self {
        Self {
            tokens: Arc::default(),
            time_to_live,
        }
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl VerificationTokenStore for HashMapVerificationTokenStore {
    fn time_to_live(&self) -> Duration {
        self.time_to_live
    }

    async fn insert(&self, token: &VerificationToken) -> Result<(), VerificationTokenStoreError> {
        self.tokens.write().await.push(token.clone());
        Ok(())
    }

    async fn exists(
        &self,
        scope: TokenScope,
        email: &Email,
        owner: Option<UserId>,
    ) -> Result<bool, VerificationTokenStoreError> {
        if missing_required_owner(scope, owner) {
            return Ok(false);
        }
        Ok(self
            .tokens
            .read()
            .await
            .iter()
            .any(|token| token.is_for(scope, email, owner)))
    }

    async fn verify(
        &self,
        plaintext: &str,
        scope: TokenScope,
        email: &Email,
        owner: Option<UserId>,
    ) -> Result<(), VerificationTokenStoreError> {
        if missing_required_owner(scope, owner) {
            return Err(VerificationTokenStoreError::TokenNotFound);
        }

        let hash = TokenHash::of(plaintext);
        let tokens = self.tokens.read().await;
        let token = tokens
            .iter()
            .find(|token| token.matches(&hash, scope, email, owner))
            .ok_or(VerificationTokenStoreError::TokenNotFound)?;

        if is_expired(token.expiry, Utc::now()) {
            return Err(VerificationTokenStoreError::TokenExpired);
        }
        Ok(())
    }

    async fn purge_by_email(&self, email: &Email) -> Result<(), VerificationTokenStoreError> {
        self.tokens.write().await.retain(|token| token.email != *email);
        Ok(())
    }

    async fn purge_by_user_id(&self, user_id: UserId) -> Result<(), VerificationTokenStoreError> {
        self.tokens
            .write()
            .await
            .retain(|token| token.owner != Some(user_id));
        Ok(())
    }
}
