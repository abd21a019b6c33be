use latchkey_core::{AuthenticationTokenStore, AuthenticationTokenStoreError, User};

/// Error types for logout use case
#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Authentication token store error: {0}")]
    AuthenticationTokenStoreError(#[from] AuthenticationTokenStoreError),
}

/// Logout use case - revokes every session token of a user
pub struct LogoutUseCase<A>
where
    A: AuthenticationTokenStore,
{
    authentication_store: A,
}

impl<A> LogoutUseCase<A>
where
    A: AuthenticationTokenStore,
{
    pub fn new(authentication_store: A) -> Self {
        Self {
            authentication_store,
        }
    }

    #[tracing::instrument(name = "LogoutUseCase::execute", skip_all, fields(user_id = %user.id()))]
    pub async fn execute(&self, user: &User) -> Result<(), LogoutError> {
        self.authentication_store.purge_by_user_id(user.id()).await?;
        Ok(())
    }
}
