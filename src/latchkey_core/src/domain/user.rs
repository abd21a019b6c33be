use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{email::Email, password::PasswordHash};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Version of a freshly inserted user row.
pub const INITIAL_USER_VERSION: i32 = 1;

/// A persisted user.
///
/// `version` is the optimistic-lock token: every successful update bumps it
/// by exactly one, and updates must present the version they last read.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    created_at: DateTime<Utc>,
    email: Email,
    password_hash: PasswordHash,
    version: i32,
}

impl User {
    pub fn new(
        id: UserId,
        created_at: DateTime<Utc>,
        email: Email,
        password_hash: PasswordHash,
        version: i32,
    ) -> Self {
        Self {
            id,
            created_at,
            email,
            password_hash,
            version,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Copy of this user carrying a new address, same version.
    pub fn with_email(&self, email: Email) -> Self {
        Self {
            email,
            ..self.clone()
        }
    }

    /// Copy of this user at the version returned by a successful update.
    pub fn with_version(&self, version: i32) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }
}
