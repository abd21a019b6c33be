use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
};

use chrono::Utc;
use latchkey_core::{
    Email, INITIAL_USER_VERSION, Password, PasswordHash, User, UserId, UserStore, UserStoreError,
};
use tokio::sync::RwLock;

use super::password_hash::{
    compute_password_hash, prepare_dummy_password_hash, verify_dummy_password_hash,
    verify_password_hash,
};

/// In-process user store with the same contract as the Postgres one.
#[derive(Clone, Default)]
pub struct HashMapUserStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    next_id: Arc<AtomicI64>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        prepare_dummy_password_hash();
        Self::default()
    }

    pub(crate) async fn ids_by_email(&self, email: &Email) -> Vec<UserId> {
        self.users
            .read()
            .await
            .values()
            .filter(|user| user.email() == email)
            .map(User::id)
            .collect()
    }
}

#[async_trait::async_trait]
impl UserStore for HashMapUserStore {
    async fn create(&self, email: Email, password: Password) -> Result<User, UserStoreError> {
        let password_hash = compute_password_hash(password)
            .await
            .map_err(UserStoreError::Fatal)?;

        let mut users = self.users.write().await;
        if users.values().any(|user| *user.email() == email) {
            return Err(UserStoreError::DuplicateEmail);
        }

        let id = UserId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let user = User::new(
            id,
            Utc::now(),
            email,
            PasswordHash::new(password_hash),
            INITIAL_USER_VERSION,
        );
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_for_credentials(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError> {
        let user = self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email() == email)
            .cloned();

        let Some(user) = user else {
            verify_dummy_password_hash(password.clone()).await;
            return Err(UserStoreError::InvalidCredentials);
        };

        let matches =
            verify_password_hash(user.password_hash().as_ref().clone(), password.clone())
                .await
                .map_err(UserStoreError::Fatal)?;
        if !matches {
            return Err(UserStoreError::InvalidCredentials);
        }
        Ok(user)
    }

    async fn exists_by_email(&self, email: &Email) -> Result<bool, UserStoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|user| user.email() == email))
    }

    async fn get_by_id(&self, id: UserId) -> Result<User, UserStoreError> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn update(&self, user: &User, expected_version: i32) -> Result<i32, UserStoreError> {
        let mut users = self.users.write().await;

        // A stale version loses before the new email is considered.
        if !users
            .get(&user.id())
            .is_some_and(|stored| stored.version() == expected_version)
        {
            return Err(UserStoreError::EditConflict);
        }

        if users
            .values()
            .any(|other| other.id() != user.id() && other.email() == user.email())
        {
            return Err(UserStoreError::DuplicateEmail);
        }

        let version = expected_version + 1;
        users.insert(user.id(), user.with_version(version));
        Ok(version)
    }
}
