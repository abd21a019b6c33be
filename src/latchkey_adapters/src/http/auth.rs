use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use latchkey_application::VerifyAuthenticationUseCase;
use latchkey_core::{AuthenticationTokenStore, Token, User};

use super::error::AuthApiError;

/// A bearer `Authorization` header, or why it could not be read.
pub type BearerHeader = Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>;

/// Pull the plaintext token out of the header. Missing, malformed and
/// wrongly shaped headers are all rejected the same way.
pub fn extract_bearer(header: BearerHeader) -> Result<String, AuthApiError> {
    let TypedHeader(Authorization(bearer)) = header.map_err(|rejection| {
        if !rejection.is_missing() {
            tracing::debug!(%rejection, "unreadable authorization header");
        }
        AuthApiError::InvalidAuthenticationToken
    })?;

    let token = bearer.token();
    if !Token::looks_valid(token) {
        return Err(AuthApiError::InvalidAuthenticationToken);
    }
    Ok(token.to_string())
}

/// Resolve the caller's bearer token to a user.
#[tracing::instrument(name = "Authenticate bearer", skip_all)]
pub async fn authenticate<A>(authentication_store: A, header: BearerHeader) -> Result<User, AuthApiError>
where
    A: AuthenticationTokenStore + 'static,
{
    let token = extract_bearer(header)?;
    let user = VerifyAuthenticationUseCase::new(authentication_store)
        .execute(&token)
        .await?;
    Ok(user)
}
