use latchkey_core::{
    Email, EmailClient, Notification, TokenScope, UserStore, UserStoreError,
    VerificationTokenStore, VerificationTokenStoreError,
};

use super::notify;
use crate::background::BackgroundTasks;

/// Which branch a verification request took. Never shown to the caller: every
/// variant must produce the same response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The address already belongs to a user; nothing was sent.
    AlreadyRegistered,
    /// A token for this subject is still on file; nothing was sent.
    AlreadyPending,
    /// A new token was stored and its email queued.
    Issued,
}

/// Error types shared by the signup and change-email request use cases
#[derive(Debug, thiserror::Error)]
pub enum RequestVerificationError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Verification token store error: {0}")]
    VerificationTokenStoreError(#[from] VerificationTokenStoreError),
}

/// Signup use case - mails a registration token to an unclaimed address
pub struct RequestRegistrationUseCase<U, V, E>
where
    U: UserStore,
    V: VerificationTokenStore,
    E: EmailClient + Clone + 'static,
{
    user_store: U,
    verification_store: V,
    email_client: E,
    background: BackgroundTasks,
}

impl<U, V, E> RequestRegistrationUseCase<U, V, E>
where
    U: UserStore,
    V: VerificationTokenStore,
    E: EmailClient + Clone + 'static,
{
    pub fn new(
        user_store: U,
        verification_store: V,
        email_client: E,
        background: BackgroundTasks,
    ) -> Self {
        Self {
            user_store,
            verification_store,
            email_client,
            background,
        }
    }

    /// Execute the signup use case
    ///
    /// Registered addresses and addresses with a token on file are skipped
    /// silently, so a caller cannot learn which addresses have accounts.
    #[tracing::instrument(name = "RequestRegistrationUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Email) -> Result<VerificationOutcome, RequestVerificationError> {
        if self.user_store.exists_by_email(&email).await? {
            return Ok(VerificationOutcome::AlreadyRegistered);
        }

        let scope = TokenScope::Registration;
        if self.verification_store.exists(scope, &email, None).await? {
            return Ok(VerificationOutcome::AlreadyPending);
        }

        let token = self.verification_store.new_token(scope, &email, None).await?;

        notify::dispatch(
            &self.background,
            &self.email_client,
            email,
            Notification::Registration {
                token: token.plaintext().clone(),
            },
        );

        Ok(VerificationOutcome::Issued)
    }
}
