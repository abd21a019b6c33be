use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use latchkey_core::{Email, EmailClient, Notification};

/// Keeps every message so tests can read the plaintext token back out.
#[derive(Debug, Clone, Default)]
pub struct RecordingEmailClient {
    sent: Arc<Mutex<Vec<(Email, Notification)>>>,
}

impl RecordingEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(Email, Notification)> {
        self.lock().clone()
    }

    /// The most recent notification addressed to `recipient`.
    pub fn last_to(&self, recipient: &Email) -> Option<Notification> {
        self.lock()
            .iter()
            .rev()
            .find(|(to, _)| to == recipient)
            .map(|(_, notification)| notification.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(Email, Notification)>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl EmailClient for RecordingEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        notification: &Notification,
    ) -> Result<(), String> {
        self.lock().push((recipient.clone(), notification.clone()));
        Ok(())
    }
}
