use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use latchkey_application::{AuthenticateUseCase, LogoutUseCase};
use latchkey_core::{AuthenticationTokenStore, Email, Password, UserStore};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::http::{
    auth::{BearerHeader, authenticate},
    error::AuthApiError,
};

#[derive(Deserialize)]
pub struct AuthenticationRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticationTokenBody {
    pub token: String,
    pub expiry: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticationTokenResponse {
    pub authentication_token: AuthenticationTokenBody,
}

#[tracing::instrument(name = "Create authentication token", skip_all)]
pub async fn create_authentication_token<U, A>(
    State((user_store, authentication_store)): State<(U, A)>,
    WithRejection(Json(request), _): WithRejection<Json<AuthenticationRequest>, AuthApiError>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + Clone + 'static,
    A: AuthenticationTokenStore + Clone + 'static,
{
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    let use_case = AuthenticateUseCase::new(user_store, authentication_store);
    let token = use_case.execute(email, password).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthenticationTokenResponse {
            authentication_token: AuthenticationTokenBody {
                token: token.plaintext().expose_secret().clone(),
                expiry: token.expiry(),
            },
        }),
    ))
}

/// Sign the caller out of every session they hold.
#[tracing::instrument(name = "Delete authentication tokens", skip_all)]
pub async fn delete_authentication_tokens<U, A>(
    State((_, authentication_store)): State<(U, A)>,
    bearer: BearerHeader,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + Clone + 'static,
    A: AuthenticationTokenStore + Clone + 'static,
{
    let user = authenticate(authentication_store.clone(), bearer).await?;

    LogoutUseCase::new(authentication_store)
        .execute(&user)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
