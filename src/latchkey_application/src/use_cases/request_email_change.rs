use latchkey_core::{
    Email, EmailClient, Notification, TokenScope, User, UserStore, VerificationTokenStore,
};

use super::{
    notify,
    request_registration::{RequestVerificationError, VerificationOutcome},
};
use crate::background::BackgroundTasks;

/// Change-email request use case - mails a token bound to the requesting user
/// to the address they want to move to
pub struct RequestEmailChangeUseCase<U, V, E>
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

impl<U, V, E> RequestEmailChangeUseCase<U, V, E>
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

    /// Execute the change-email request use case
    ///
    /// # Arguments
    /// * `owner` - The authenticated user asking for the change
    /// * `new_email` - The address that should receive the token
    #[tracing::instrument(
        name = "RequestEmailChangeUseCase::execute",
        skip_all,
        fields(user_id = %owner.id())
    )]
    pub async fn execute(
        &self,
        owner: &User,
        new_email: Email,
    ) -> Result<VerificationOutcome, RequestVerificationError> {
        if self.user_store.exists_by_email(&new_email).await? {
            return Ok(VerificationOutcome::AlreadyRegistered);
        }

        let scope = TokenScope::ChangeEmail;
        let owner_id = Some(owner.id());
        if self
            .verification_store
            .exists(scope, &new_email, owner_id)
            .await?
        {
            return Ok(VerificationOutcome::AlreadyPending);
        }

        let token = self
            .verification_store
            .new_token(scope, &new_email, owner_id)
            .await?;

        notify::dispatch(
            &self.background,
            &self.email_client,
            new_email,
            Notification::ChangeEmail {
                token: token.plaintext().clone(),
            },
        );

        Ok(VerificationOutcome::Issued)
    }
}
