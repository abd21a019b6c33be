use std::time::Duration;

use chrono::{DateTime, Utc};
use latchkey_core::{
    Email, TokenHash, TokenScope, UserId, VerificationToken, VerificationTokenStore,
    VerificationTokenStoreError, is_expired, missing_required_owner,
};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use super::{DEFAULT_QUERY_TIMEOUT, with_timeout};

#[derive(Clone)]
pub struct PostgresVerificationTokenStore {
    pool: PgPool,
    time_to_live: chrono::Duration,
    query_timeout: Duration,
}

impl PostgresVerificationTokenStore {
    pub fn new(pool: PgPool, time_to_live: chrono::Duration) -> Self {
        Self {
            pool,
            time_to_live,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }
}

#[async_trait::async_trait]
impl VerificationTokenStore for PostgresVerificationTokenStore {
    fn time_to_live(&self) -> chrono::Duration {
        self.time_to_live
    }

    #[tracing::instrument(name = "Storing verification token", skip_all, fields(scope = %token.scope))]
    async fn insert(&self, token: &VerificationToken) -> Result<(), VerificationTokenStoreError> {
        let query = sqlx::query(
            r#"
                INSERT INTO verification_token_ (hash_, scope_, email_, user_id_, expiry_)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(token.hash.as_bytes().as_slice())
        .bind(token.scope.as_str())
        .bind(token.email.as_ref().expose_secret())
        .bind(token.owner.map(|id| id.get()))
        .bind(token.expiry)
        .execute(&self.pool);

        with_timeout(self.query_timeout, query).await?;
        Ok(())
    }

    #[tracing::instrument(name = "Checking for pending verification token", skip_all, fields(%scope))]
    async fn exists(
        &self,
        scope: TokenScope,
        email: &Email,
        owner: Option<UserId>,
    ) -> Result<bool, VerificationTokenStoreError> {
        if missing_required_owner(scope, owner) {
            return Ok(false);
        }

        let query = sqlx::query_scalar::<_, bool>(
            r#"
                SELECT EXISTS (
                    SELECT 1 FROM verification_token_
                    WHERE scope_ = $1 AND email_ = $2 AND user_id_ IS NOT DISTINCT FROM $3
                )
            "#,
        )
        .bind(scope.as_str())
        .bind(email.as_ref().expose_secret())
        .bind(owner.map(|id| id.get()))
        .fetch_one(&self.pool);

        Ok(with_timeout(self.query_timeout, query).await?)
    }

    #[tracing::instrument(name = "Verifying verification token", skip_all, fields(%scope))]
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
        let query = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
                SELECT expiry_ FROM verification_token_
                WHERE hash_ = $1 AND scope_ = $2 AND email_ = $3
                    AND user_id_ IS NOT DISTINCT FROM $4
                LIMIT 1
            "#,
        )
        .bind(hash.as_bytes().as_slice())
        .bind(scope.as_str())
        .bind(email.as_ref().expose_secret())
        .bind(owner.map(|id| id.get()))
        .fetch_optional(&self.pool);

        let expiry = with_timeout(self.query_timeout, query)
            .await?
            .ok_or(VerificationTokenStoreError::TokenNotFound)?;

        if is_expired(expiry, Utc::now()) {
            return Err(VerificationTokenStoreError::TokenExpired);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Purging verification tokens by email", skip_all)]
    async fn purge_by_email(&self, email: &Email) -> Result<(), VerificationTokenStoreError> {
        let query = sqlx::query("DELETE FROM verification_token_ WHERE email_ = $1")
            .bind(email.as_ref().expose_secret())
            .execute(&self.pool);

        with_timeout(self.query_timeout, query).await?;
        Ok(())
    }

    #[tracing::instrument(name = "Purging verification tokens by user", skip(self))]
    async fn purge_by_user_id(&self, user_id: UserId) -> Result<(), VerificationTokenStoreError> {
        let query = sqlx::query("DELETE FROM verification_token_ WHERE user_id_ = $1")
            .bind(user_id.get())
            .execute(&self.pool);

        with_timeout(self.query_timeout, query).await?;
        Ok(())
    }
}
