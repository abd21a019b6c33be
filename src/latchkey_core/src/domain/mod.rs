pub mod authentication_token;
pub mod email;
pub mod password;
pub mod scope;
pub mod token;
pub mod user;
pub mod verification_token;
