use latchkey_core::{AuthenticationTokenStore, AuthenticationTokenStoreError, User};

/// Error types for verify authentication use case
#[derive(Debug, thiserror::Error)]
pub enum VerifyAuthenticationError {
    #[error("Authentication token store error: {0}")]
    AuthenticationTokenStoreError(#[from] AuthenticationTokenStoreError),
}

/// Verify authentication use case - resolves a bearer token to its user
pub struct VerifyAuthenticationUseCase<A>
where
    A: AuthenticationTokenStore,
{
    authentication_store: A,
}

impl<A> VerifyAuthenticationUseCase<A>
where
    A: AuthenticationTokenStore,
{
    pub fn new(authentication_store: A) -> Self {
        Self {
            authentication_store,
        }
    }

    #[tracing::instrument(name = "VerifyAuthenticationUseCase::execute", skip_all)]
    pub async fn execute(&self, token: &str) -> Result<User, VerifyAuthenticationError> {
        Ok(self.authentication_store.verify(token).await?)
    }
}
