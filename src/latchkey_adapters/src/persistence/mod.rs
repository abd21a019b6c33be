mod password_hash;
pub mod hashmap_authentication_token_store;
pub mod hashmap_user_store;
pub mod hashmap_verification_token_store;
pub mod postgres_authentication_token_store;
pub mod postgres_user_store;
pub mod postgres_verification_token_store;

pub use hashmap_authentication_token_store::HashMapAuthenticationTokenStore;
pub use hashmap_user_store::HashMapUserStore;
pub use hashmap_verification_token_store::HashMapVerificationTokenStore;
pub use postgres_authentication_token_store::PostgresAuthenticationTokenStore;
pub use postgres_user_store::PostgresUserStore;
pub use postgres_verification_token_store::PostgresVerificationTokenStore;

use std::{future::Future, time::Duration};

use latchkey_core::{AuthenticationTokenStoreError, UserStoreError, VerificationTokenStoreError};

/// Upper bound on a single store query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub(crate) enum QueryError {
    #[error("query timed out after {0:?}")]
    TimedOut(Duration),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl QueryError {
    pub(crate) fn is_unique_violation(&self) -> bool {
        match self {
            QueryError::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
            }
            _ => false,
        }
    }

    /// Failures a retry may clear: timeouts and connectivity, not bad SQL
    /// or corrupt rows.
    pub(crate) fn is_transient(&self) -> bool {
        match self {
            QueryError::TimedOut(_) => true,
            QueryError::Database(e) => matches!(
                e,
                sqlx::Error::Io(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::WorkerCrashed
            ),
        }
    }
}

/// Run `query`, giving up after `limit`.
pub(crate) async fn with_timeout<T, F>(limit: Duration, query: F) -> Result<T, QueryError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, query).await {
        Ok(result) => result.map_err(QueryError::from),
        Err(_) => Err(QueryError::TimedOut(limit)),
    }
}

impl From<QueryError> for UserStoreError {
    fn from(error: QueryError) -> Self {
        if error.is_transient() {
            UserStoreError::Transient(error.to_string())
        } else {
            UserStoreError::Fatal(error.to_string())
        }
    }
}

impl From<QueryError> for VerificationTokenStoreError {
    fn from(error: QueryError) -> Self {
        if error.is_transient() {
            VerificationTokenStoreError::Transient(error.to_string())
        } else {
            VerificationTokenStoreError::Fatal(error.to_string())
        }
    }
}

impl From<QueryError> for AuthenticationTokenStoreError {
    fn from(error: QueryError) -> Self {
        if error.is_transient() {
            AuthenticationTokenStoreError::Transient(error.to_string())
        } else {
            AuthenticationTokenStoreError::Fatal(error.to_string())
        }
    }
}
