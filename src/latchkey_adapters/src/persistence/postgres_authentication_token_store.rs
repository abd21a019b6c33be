use std::time::Duration;

use chrono::{DateTime, Utc};
use latchkey_core::{
    AuthenticationToken, AuthenticationTokenStore, AuthenticationTokenStoreError, Email,
    TokenHash, User, UserId, is_expired,
};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use super::{
    DEFAULT_QUERY_TIMEOUT,
    postgres_user_store::{USER_COLUMNS, UserRow},
    with_timeout,
};

#[derive(sqlx::FromRow)]
struct SessionRow {
    #[sqlx(flatten)]
    user: UserRow,
    #[sqlx(rename = "expiry_")]
    expiry: DateTime<Utc>,
}

#[derive(Clone)]
pub struct PostgresAuthenticationTokenStore {
    pool: PgPool,
    time_to_live: chrono::Duration,
    query_timeout: Duration,
}

impl PostgresAuthenticationTokenStore {
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
impl AuthenticationTokenStore for PostgresAuthenticationTokenStore {
    fn time_to_live(&self) -> chrono::Duration {
        self.time_to_live
    }

    #[tracing::instrument(name = "Storing authentication token", skip_all, fields(user_id = %token.user_id))]
    async fn insert(
        &self,
        token: &AuthenticationToken,
    ) -> Result<(), AuthenticationTokenStoreError> {
        let query = sqlx::query(
            "INSERT INTO authentication_token_ (hash_, user_id_, expiry_) VALUES ($1, $2, $3)",
        )
        .bind(token.hash.as_bytes().as_slice())
        .bind(token.user_id.get())
        .bind(token.expiry)
        .execute(&self.pool);

        with_timeout(self.query_timeout, query).await?;
        Ok(())
    }

    #[tracing::instrument(name = "Verifying authentication token", skip_all)]
    async fn verify(&self, plaintext: &str) -> Result<User, AuthenticationTokenStoreError> {
        let hash = TokenHash::of(plaintext);
        let sql = format!(
            r#"
                SELECT {USER_COLUMNS}, authentication_token_.expiry_
                FROM user_
                INNER JOIN authentication_token_
                    ON user_.id_ = authentication_token_.user_id_
                WHERE authentication_token_.hash_ = $1
            "#
        );
        let query = sqlx::query_as::<_, SessionRow>(&sql)
            .bind(hash.as_bytes().as_slice())
            .fetch_optional(&self.pool);

        let row = with_timeout(self.query_timeout, query)
            .await?
            .ok_or(AuthenticationTokenStoreError::TokenNotFound)?;

        if is_expired(row.expiry, Utc::now()) {
            return Err(AuthenticationTokenStoreError::TokenExpired);
        }

        User::try_from(row.user).map_err(AuthenticationTokenStoreError::Fatal)
    }

    #[tracing::instrument(name = "Purging authentication tokens by user", skip(self))]
    async fn purge_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<(), AuthenticationTokenStoreError> {
        let query = sqlx::query("DELETE FROM authentication_token_ WHERE user_id_ = $1")
            .bind(user_id.get())
            .execute(&self.pool);

        with_timeout(self.query_timeout, query).await?;
        Ok(())
    }

    #[tracing::instrument(name = "Purging authentication tokens by email", skip_all)]
    async fn purge_by_email(&self, email: &Email) -> Result<(), AuthenticationTokenStoreError> {
        let query = sqlx::query(
            r#"
                DELETE FROM authentication_token_
                WHERE user_id_ IN (SELECT id_ FROM user_ WHERE email_ = $1)
            "#,
        )
        .bind(email.as_ref().expose_secret())
        .execute(&self.pool);

        with_timeout(self.query_timeout, query).await?;
        Ok(())
    }
}
