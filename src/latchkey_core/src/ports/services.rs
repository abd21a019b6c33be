use async_trait::async_trait;
use secrecy::Secret;

use crate::domain::email::Email;

/// An outbound message carrying a plaintext token to its recipient.
#[derive(Debug, Clone)]
pub enum Notification {
    Registration { token: Secret<String> },
    ChangeEmail { token: Secret<String> },
}

impl Notification {
    pub fn template_name(&self) -> &'static str {
        match self {
            Notification::Registration { .. } => "registration",
            Notification::ChangeEmail { .. } => "change-email",
        }
    }

    pub fn token(&self) -> &Secret<String> {
        match self {
            Notification::Registration { token } | Notification::ChangeEmail { token } => token,
        }
    }
}

/// Port trait for email sending service
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        notification: &Notification,
    ) -> Result<(), String>;
}
