use std::time::Duration;

use chrono::{DateTime, Utc};
use latchkey_core::{Email, Password, PasswordHash, User, UserId, UserStore, UserStoreError};
use secrecy::{ExposeSecret, Secret};
use sqlx::PgPool;

use super::{
    DEFAULT_QUERY_TIMEOUT,
    password_hash::{
        compute_password_hash, prepare_dummy_password_hash, verify_dummy_password_hash,
        verify_password_hash,
    },
    with_timeout,
};

/// Column list shared by every query that loads a user.
pub(crate) const USER_COLUMNS: &str = "user_.id_, user_.created_at_, user_.email_, user_.password_hash_, user_.version_";

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    #[sqlx(rename = "id_")]
    id: i64,
    #[sqlx(rename = "created_at_")]
    created_at: DateTime<Utc>,
    #[sqlx(rename = "email_")]
    email: String,
    #[sqlx(rename = "password_hash_")]
    password_hash: String,
    #[sqlx(rename = "version_")]
    version: i32,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| format!("stored email: {e}"))?;
        Ok(User::new(
            UserId::new(row.id),
            row.created_at,
            email,
            PasswordHash::new(Secret::new(row.password_hash)),
            row.version,
        ))
    }
}

#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        prepare_dummy_password_hash();
        PostgresUserStore {
            pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn create(&self, email: Email, password: Password) -> Result<User, UserStoreError> {
        let password_hash = compute_password_hash(password)
            .await
            .map_err(UserStoreError::Fatal)?;

        let sql = format!(
            "INSERT INTO user_ (email_, password_hash_) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        );
        let query = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_ref().expose_secret())
            .bind(password_hash.expose_secret())
            .fetch_one(&self.pool);

        let row = with_timeout(self.query_timeout, query)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    return UserStoreError::DuplicateEmail;
                }
                e.into()
            })?;

        User::try_from(row).map_err(UserStoreError::Fatal)
    }

    #[tracing::instrument(name = "Validating user credentials in PostgreSQL", skip_all)]
    async fn get_for_credentials(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM user_ WHERE email_ = $1");
        let query = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_ref().expose_secret())
            .fetch_optional(&self.pool);

        let Some(row) = with_timeout(self.query_timeout, query).await? else {
            verify_dummy_password_hash(password.clone()).await;
            return Err(UserStoreError::InvalidCredentials);
        };

        let matches = verify_password_hash(Secret::new(row.password_hash.clone()), password.clone())
            .await
            .map_err(UserStoreError::Fatal)?;
        if !matches {
            return Err(UserStoreError::InvalidCredentials);
        }

        User::try_from(row).map_err(UserStoreError::Fatal)
    }

    #[tracing::instrument(name = "Checking email in PostgreSQL", skip_all)]
    async fn exists_by_email(&self, email: &Email) -> Result<bool, UserStoreError> {
        let query = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM user_ WHERE email_ = $1)",
        )
        .bind(email.as_ref().expose_secret())
        .fetch_one(&self.pool);

        Ok(with_timeout(self.query_timeout, query).await?)
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip(self))]
    async fn get_by_id(&self, id: UserId) -> Result<User, UserStoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM user_ WHERE id_ = $1");
        let query = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool);

        let Some(row) = with_timeout(self.query_timeout, query).await? else {
            return Err(UserStoreError::UserNotFound);
        };

        User::try_from(row).map_err(UserStoreError::Fatal)
    }

    #[tracing::instrument(name = "Updating user in PostgreSQL", skip_all, fields(user_id = %user.id()))]
    async fn update(&self, user: &User, expected_version: i32) -> Result<i32, UserStoreError> {
        let query = sqlx::query_scalar::<_, i32>(
            r#"
                UPDATE user_
                SET email_ = $1, password_hash_ = $2, version_ = version_ + 1
                WHERE id_ = $3 AND version_ = $4
                RETURNING version_
            "#,
        )
        .bind(user.email().as_ref().expose_secret())
        .bind(user.password_hash().as_ref().expose_secret())
        .bind(user.id().get())
        .bind(expected_version)
        .fetch_optional(&self.pool);

        let version = with_timeout(self.query_timeout, query)
            .await
            .map_err(|e| {
                if e.is_unique_violation() {
                    return UserStoreError::DuplicateEmail;
                }
                e.into()
            })?;

        // No row: the id is gone or another writer got there first.
        version.ok_or(UserStoreError::EditConflict)
    }
}
