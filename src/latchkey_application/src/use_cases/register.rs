use latchkey_core::{
    Email, Password, TokenScope, User, UserStore, UserStoreError, VerificationTokenStore,
    VerificationTokenStoreError,
};
use secrecy::{ExposeSecret, Secret};

/// Error types for register use case
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Verification token store error: {0}")]
    VerificationTokenStoreError(#[from] VerificationTokenStoreError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
}

/// Register use case - consumes a registration token and creates the user
pub struct RegisterUseCase<U, V>
where
    U: UserStore,
    V: VerificationTokenStore,
{
    user_store: U,
    verification_store: V,
}

impl<U, V> RegisterUseCase<U, V>
where
    U: UserStore,
    V: VerificationTokenStore,
{
    pub fn new(user_store: U, verification_store: V) -> Self {
        Self {
            user_store,
            verification_store,
        }
    }

    /// Execute the register use case
    ///
    /// # Arguments
    /// * `email` - Address the token was mailed to
    /// * `password` - Password for the new account
    /// * `token` - Plaintext registration token
    ///
    /// # Returns
    /// The created user, or RegisterError. A consumed token is purged together
    /// with every other token on file for the address.
    #[tracing::instrument(name = "RegisterUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
        token: Secret<String>,
    ) -> Result<User, RegisterError> {
        self.verification_store
            .verify(token.expose_secret(), TokenScope::Registration, &email, None)
            .await?;

        self.verification_store.purge_by_email(&email).await?;

        let user = self.user_store.create(email, password).await?;
        tracing::info!(user_id = %user.id(), "user registered");

        Ok(user)
    }
}
