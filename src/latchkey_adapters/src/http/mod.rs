pub mod auth;
pub mod error;
pub mod routes;

pub use auth::{BearerHeader, authenticate};
pub use error::{AuthApiError, ErrorResponse};
