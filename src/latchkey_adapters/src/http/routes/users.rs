use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use latchkey_application::{ChangeEmailUseCase, RegisterUseCase};
use latchkey_core::{
    AuthenticationTokenStore, Email, Password, Token, UserStore, VerificationTokenStore,
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::{UserBody, UserResponse};
use crate::http::{
    auth::{BearerHeader, authenticate},
    error::AuthApiError,
};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
    pub token: Secret<String>,
}

#[derive(Deserialize)]
pub struct ChangeEmailRequest {
    pub email: Secret<String>,
    pub token: Secret<String>,
}

fn parse_verification_token(token: Secret<String>) -> Result<Secret<String>, AuthApiError> {
    if !Token::looks_valid(token.expose_secret()) {
        return Err(AuthApiError::InvalidInput(
            "token must be a valid verification token".to_string(),
        ));
    }
    Ok(token)
}

#[tracing::instrument(name = "Register user", skip_all)]
pub async fn register_user<U, V>(
    State((user_store, verification_store)): State<(U, V)>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterRequest>, AuthApiError>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + Clone + 'static,
    V: VerificationTokenStore + Clone + 'static,
{
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;
    let token = parse_verification_token(request.token)?;

    let use_case = RegisterUseCase::new(user_store, verification_store);
    let user = use_case.execute(email, password, token).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            user: UserBody::from(&user),
        }),
    ))
}

#[tracing::instrument(name = "Show current user", skip_all)]
pub async fn show_current_user<A>(
    State(authentication_store): State<A>,
    bearer: BearerHeader,
) -> Result<impl IntoResponse, AuthApiError>
where
    A: AuthenticationTokenStore + Clone + 'static,
{
    let user = authenticate(authentication_store, bearer).await?;

    Ok(Json(UserResponse {
        user: UserBody::from(&user),
    }))
}

#[tracing::instrument(name = "Change current user email", skip_all)]
pub async fn change_current_user_email<U, V, A>(
    State((user_store, verification_store, authentication_store)): State<(U, V, A)>,
    bearer: BearerHeader,
    WithRejection(Json(request), _): WithRejection<Json<ChangeEmailRequest>, AuthApiError>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + Clone + 'static,
    V: VerificationTokenStore + Clone + 'static,
    A: AuthenticationTokenStore + Clone + 'static,
{
    let user = authenticate(authentication_store.clone(), bearer).await?;
    let new_email = Email::try_from(request.email)?;
    let token = parse_verification_token(request.token)?;

    let use_case = ChangeEmailUseCase::new(user_store, verification_store, authentication_store);
    let updated = use_case.execute(&user, new_email, token).await?;

    Ok(Json(UserResponse {
        user: UserBody::from(&updated),
    }))
}
