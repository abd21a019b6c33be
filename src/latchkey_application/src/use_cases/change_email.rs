use latchkey_core::{
    AuthenticationTokenStore, AuthenticationTokenStoreError, Email, TokenScope, User, UserStore,
    UserStoreError, VerificationTokenStore, VerificationTokenStoreError,
};
use secrecy::{ExposeSecret, Secret};

/// Error types for change email use case
#[derive(Debug, thiserror::Error)]
pub enum ChangeEmailError {
    #[error("Verification token store error: {0}")]
    VerificationTokenStoreError(#[from] VerificationTokenStoreError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Authentication token store error: {0}")]
    AuthenticationTokenStoreError(#[from] AuthenticationTokenStoreError),
}

/// Change email use case - consumes a change-email token and moves the user
/// to the verified address
pub struct ChangeEmailUseCase<U, V, A>
where
    U: UserStore,
    V: VerificationTokenStore,
    A: AuthenticationTokenStore,
{
    user_store: U,
    verification_store: V,
    authentication_store: A,
}

impl<U, V, A> ChangeEmailUseCase<U, V, A>
where
    U: UserStore,
    V: VerificationTokenStore,
    A: AuthenticationTokenStore,
{
    pub fn new(user_store: U, verification_store: V, authentication_store: A) -> Self {
        Self {
            user_store,
            verification_store,
            authentication_store,
        }
    }

    /// Execute the change email use case
    ///
    /// # Arguments
    /// * `user` - The authenticated user, as last read (its version is the
    ///   expected version of the update)
    /// * `new_email` - Address the token was mailed to
    /// * `token` - Plaintext change-email token
    ///
    /// # Returns
    /// The updated user at its new version. Every pending change request of
    /// the user and every session they hold are revoked.
    #[tracing::instrument(
        name = "ChangeEmailUseCase::execute",
        skip_all,
        fields(user_id = %user.id())
    )]
    pub async fn execute(
        &self,
        user: &User,
        new_email: Email,
        token: Secret<String>,
    ) -> Result<User, ChangeEmailError> {
        self.verification_store
            .verify(
                token.expose_secret(),
                TokenScope::ChangeEmail,
                &new_email,
                Some(user.id()),
            )
            .await?;

        self.verification_store.purge_by_user_id(user.id()).await?;

        let updated = user.with_email(new_email);
        let version = self.user_store.update(&updated, user.version()).await?;

        self.authentication_store.purge_by_user_id(user.id()).await?;
        tracing::info!(version, "user email changed");

        Ok(updated.with_version(version))
    }
}
