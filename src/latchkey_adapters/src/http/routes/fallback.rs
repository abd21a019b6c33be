use crate::http::error::AuthApiError;

pub async fn not_found() -> AuthApiError {
    AuthApiError::NotFound
}

pub async fn method_not_allowed() -> AuthApiError {
    AuthApiError::MethodNotAllowed
}
