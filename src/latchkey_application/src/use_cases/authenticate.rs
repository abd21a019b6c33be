use latchkey_core::{
    AuthenticationTokenStore, AuthenticationTokenStoreError, Email, Password, Token, UserStore,
    UserStoreError,
};

/// Error types for authenticate use case
#[derive(Debug, thiserror::Error)]
pub enum AuthenticateError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Authentication token store error: {0}")]
    AuthenticationTokenStoreError(#[from] AuthenticationTokenStoreError),
}

/// Authenticate use case - exchanges credentials for a session token
pub struct AuthenticateUseCase<U, A>
where
    U: UserStore,
    A: AuthenticationTokenStore,
{
    user_store: U,
    authentication_store: A,
}

impl<U, A> AuthenticateUseCase<U, A>
where
    U: UserStore,
    A: AuthenticationTokenStore,
{
    pub fn new(user_store: U, authentication_store: A) -> Self {
        Self {
            user_store,
            authentication_store,
        }
    }

    /// Execute the authenticate use case
    ///
    /// # Returns
    /// A fresh authentication token. Earlier tokens of the user stay valid.
    #[tracing::instrument(name = "AuthenticateUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Email, password: Password) -> Result<Token, AuthenticateError> {
        let user = self
            .user_store
            .get_for_credentials(&email, &password)
            .await?;

        let token = self.authentication_store.new_token(user.id()).await?;
        tracing::info!(user_id = %user.id(), "authentication token issued");

        Ok(token)
    }
}
