pub mod authentication_tokens;
pub mod fallback;
pub mod healthcheck;
pub mod users;
pub mod verification_tokens;

pub use authentication_tokens::{create_authentication_token, delete_authentication_tokens};
pub use fallback::{method_not_allowed, not_found};
pub use healthcheck::{SystemInfo, healthcheck};
pub use users::{change_current_user_email, register_user, show_current_user};
pub use verification_tokens::{
    VERIFICATION_SENT_MESSAGE, create_email_change_token, create_verification_token,
};

use chrono::{DateTime, Utc};
use latchkey_core::{User, UserId};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Public view of a user. Never carries the password hash or version.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserBody {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
    pub email: String,
}

impl From<&User> for UserBody {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            created_at: user.created_at(),
            email: user.email().as_ref().expose_secret().clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
