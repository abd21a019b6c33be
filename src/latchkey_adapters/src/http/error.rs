use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use latchkey_application::{
    AuthenticateError, ChangeEmailError, LogoutError, RegisterError, RequestVerificationError,
    VerifyAuthenticationError,
};
use latchkey_core::{
    AuthenticationTokenStoreError, EmailError, PasswordError, UserStoreError,
    VerificationTokenStoreError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SIGNUP_AGAIN_HINT: &str = "Expired token. Please signup again.";
pub const REQUEST_CHANGE_AGAIN_HINT: &str = "Expired token. Please request a new email change.";

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Unauthorized")]
    InvalidVerificationToken,

    #[error("{0}")]
    ExpiredVerificationToken(&'static str),

    #[error("invalid authentication credentials")]
    InvalidCredentials,

    #[error("invalid or missing authentication token")]
    InvalidAuthenticationToken,

    #[error("a user with this email address already exists")]
    DuplicateEmail,

    #[error("unable to update the record due to an edit conflict, please try again")]
    EditConflict,

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match &self {
            AuthApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AuthApiError::InvalidInput(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AuthApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AuthApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, self.to_string()),

            AuthApiError::InvalidVerificationToken
            | AuthApiError::ExpiredVerificationToken(_)
            | AuthApiError::InvalidCredentials
            | AuthApiError::InvalidAuthenticationToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }

            AuthApiError::DuplicateEmail | AuthApiError::EditConflict => {
                (StatusCode::CONFLICT, self.to_string())
            }

            AuthApiError::Unavailable(detail) => {
                tracing::error!(error = %detail, "store temporarily unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "the server is temporarily unable to handle the request, please try again later"
                        .to_string(),
                )
            }

            AuthApiError::UnexpectedError(detail) => {
                tracing::error!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        let mut response = (status_code, body).into_response();
        if matches!(self, AuthApiError::InvalidAuthenticationToken) {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<JsonRejection> for AuthApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        match rejection {
            JsonRejection::JsonDataError(_) => {
                AuthApiError::InvalidInput("body contains fields of the wrong type".to_string())
            }
            JsonRejection::MissingJsonContentType(_) => {
                AuthApiError::BadRequest("body must be sent as application/json")
            }
            _ => AuthApiError::BadRequest("body contains badly-formed JSON"),
        }
    }
}

impl From<EmailError> for AuthApiError {
    fn from(error: EmailError) -> Self {
        AuthApiError::InvalidInput(format!("email {error}"))
    }
}

impl From<PasswordError> for AuthApiError {
    fn from(error: PasswordError) -> Self {
        AuthApiError::InvalidInput(format!("password {error}"))
    }
}

impl From<UserStoreError> for AuthApiError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::DuplicateEmail => AuthApiError::DuplicateEmail,
            UserStoreError::InvalidCredentials => AuthApiError::InvalidCredentials,
            UserStoreError::EditConflict => AuthApiError::EditConflict,
            UserStoreError::Transient(e) => AuthApiError::Unavailable(e),
            UserStoreError::UserNotFound => AuthApiError::UnexpectedError(error.to_string()),
            UserStoreError::Fatal(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<AuthenticationTokenStoreError> for AuthApiError {
    fn from(error: AuthenticationTokenStoreError) -> Self {
        match error {
            AuthenticationTokenStoreError::TokenNotFound
            | AuthenticationTokenStoreError::TokenExpired => AuthApiError::InvalidAuthenticationToken,
            AuthenticationTokenStoreError::Transient(e) => AuthApiError::Unavailable(e),
            AuthenticationTokenStoreError::Fatal(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl AuthApiError {
    /// Map a verification-token failure; `restart_hint` tells the caller how
    /// to get a fresh token when theirs has expired.
    pub fn from_verification(error: VerificationTokenStoreError, restart_hint: &'static str) -> Self {
        match error {
            VerificationTokenStoreError::TokenNotFound => AuthApiError::InvalidVerificationToken,
            VerificationTokenStoreError::TokenExpired => {
                AuthApiError::ExpiredVerificationToken(restart_hint)
            }
            VerificationTokenStoreError::Transient(e) => AuthApiError::Unavailable(e),
            VerificationTokenStoreError::Fatal(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<RequestVerificationError> for AuthApiError {
    fn from(error: RequestVerificationError) -> Self {
        match error {
            RequestVerificationError::UserStoreError(e) => e.into(),
            // Issuing never verifies, so there is no expiry to explain.
            RequestVerificationError::VerificationTokenStoreError(e) => {
                AuthApiError::from_verification(e, SIGNUP_AGAIN_HINT)
            }
        }
    }
}

impl From<RegisterError> for AuthApiError {
    fn from(error: RegisterError) -> Self {
        match error {
            RegisterError::VerificationTokenStoreError(e) => {
                AuthApiError::from_verification(e, SIGNUP_AGAIN_HINT)
            }
            RegisterError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<ChangeEmailError> for AuthApiError {
    fn from(error: ChangeEmailError) -> Self {
        match error {
            ChangeEmailError::VerificationTokenStoreError(e) => {
                AuthApiError::from_verification(e, REQUEST_CHANGE_AGAIN_HINT)
            }
            ChangeEmailError::UserStoreError(e) => e.into(),
            ChangeEmailError::AuthenticationTokenStoreError(e) => e.into(),
        }
    }
}

impl From<AuthenticateError> for AuthApiError {
    fn from(error: AuthenticateError) -> Self {
        match error {
            AuthenticateError::UserStoreError(e) => e.into(),
            // A store that cannot mint a session is never the caller's fault.
            AuthenticateError::AuthenticationTokenStoreError(e) => match e {
                AuthenticationTokenStoreError::Transient(e) => AuthApiError::Unavailable(e),
                other => AuthApiError::UnexpectedError(other.to_string()),
            },
        }
    }
}

impl From<VerifyAuthenticationError> for AuthApiError {
    fn from(error: VerifyAuthenticationError) -> Self {
        match error {
            VerifyAuthenticationError::AuthenticationTokenStoreError(e) => e.into(),
        }
    }
}

impl From<LogoutError> for AuthApiError {
    fn from(error: LogoutError) -> Self {
        match error {
            LogoutError::AuthenticationTokenStoreError(e) => e.into(),
        }
    }
}
