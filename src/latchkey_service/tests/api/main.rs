mod authentication;
mod email_change;
mod errors;
mod healthcheck;
mod helpers;
mod postgres;
mod users;
mod verification_tokens;
