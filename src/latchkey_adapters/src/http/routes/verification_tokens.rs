use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use latchkey_application::{
    BackgroundTasks, RequestEmailChangeUseCase, RequestRegistrationUseCase,
};
use latchkey_core::{AuthenticationTokenStore, Email, EmailClient, UserStore, VerificationTokenStore};
use secrecy::Secret;
use serde::Deserialize;

use super::MessageResponse;
use crate::http::{
    auth::{BearerHeader, authenticate},
    error::AuthApiError,
};

/// Body of every successful verification request, whether or not a mail
/// actually went out.
pub const VERIFICATION_SENT_MESSAGE: &str =
    "A verification email has been sent. Please check your inbox.";

#[derive(Deserialize)]
pub struct VerificationTokenRequest {
    pub email: Secret<String>,
}

fn verification_sent() -> (StatusCode, Json<MessageResponse>) {
    (
        StatusCode::OK,
        Json(MessageResponse {
            message: VERIFICATION_SENT_MESSAGE.to_string(),
        }),
    )
}

#[tracing::instrument(name = "Create verification token", skip_all)]
pub async fn create_verification_token<U, V, E>(
    State((user_store, verification_store, email_client, background)): State<(
        U,
        V,
        E,
        BackgroundTasks,
    )>,
    WithRejection(Json(request), _): WithRejection<Json<VerificationTokenRequest>, AuthApiError>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + Clone + 'static,
    V: VerificationTokenStore + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let email = Email::try_from(request.email)?;

    let use_case =
        RequestRegistrationUseCase::new(user_store, verification_store, email_client, background);
    let outcome = use_case.execute(email).await?;
    tracing::debug!(?outcome, "verification request handled");

    Ok(verification_sent())
}

#[tracing::instrument(name = "Create email change token", skip_all)]
pub async fn create_email_change_token<U, V, A, E>(
    State((user_store, verification_store, authentication_store, email_client, background)): State<
        (U, V, A, E, BackgroundTasks),
    >,
    bearer: BearerHeader,
    WithRejection(Json(request), _): WithRejection<Json<VerificationTokenRequest>, AuthApiError>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + Clone + 'static,
    V: VerificationTokenStore + Clone + 'static,
    A: AuthenticationTokenStore + Clone + 'static,
    E: EmailClient + Clone + 'static,
{
    let owner = authenticate(authentication_store, bearer).await?;
    let new_email = Email::try_from(request.email)?;

    let use_case =
        RequestEmailChangeUseCase::new(user_store, verification_store, email_client, background);
    let outcome = use_case.execute(&owner, new_email).await?;
    tracing::debug!(?outcome, "email change request handled");

    Ok(verification_sent())
}
