use std::sync::LazyLock;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{self, PasswordHasher, SaltString, rand_core},
};
use latchkey_core::Password;
use secrecy::{ExposeSecret, Secret};

/// Verified against when an email has no account, so an unknown address
/// costs as much as a wrong password.
static DUMMY_PASSWORD_HASH: LazyLock<Result<String, String>> =
    LazyLock::new(|| hash("latchkey-timing-equalizer"));

fn hasher() -> Result<Argon2<'static>, String> {
    Ok(Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None).map_err(|e| e.to_string())?,
    ))
}

fn hash(password: &str) -> Result<String, String> {
    let salt: SaltString = SaltString::generate(rand_core::OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| e.to_string())
}

fn verify(expected_password_hash: &str, candidate: &str) -> Result<bool, String> {
    let expected_password_hash =
        PasswordHash::new(expected_password_hash).map_err(|e| e.to_string())?;

    match hasher()?.verify_password(candidate.as_bytes(), &expected_password_hash) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.to_string()),
    }
}

#[tracing::instrument(name = "Computing password hash", skip_all)]
pub(crate) async fn compute_password_hash(password: Password) -> Result<Secret<String>, String> {
    let current_span: tracing::Span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| hash(password.as_ref().expose_secret()).map(Secret::new))
    })
    .await
    .map_err(|e| e.to_string())?
}

/// Returns `Ok(false)` on a mismatch; `Err` only when the stored hash is
/// unreadable or the blocking pool failed.
#[tracing::instrument(name = "Verify password hash", skip_all)]
pub(crate) async fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Password,
) -> Result<bool, String> {
    let current_span: tracing::Span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| {
            verify(
                expected_password_hash.expose_secret(),
                password_candidate.as_ref().expose_secret(),
            )
        })
    })
    .await
    .map_err(|e| e.to_string())?
}

/// Build the dummy hash now so the first unknown-email login does not pay
/// for it. Blocks the calling thread for one Argon2 hash.
pub(crate) fn prepare_dummy_password_hash() {
    if let Err(e) = LazyLock::force(&DUMMY_PASSWORD_HASH) {
        tracing::warn!(error = %e, "failed to prepare dummy password hash");
    }
}

/// Burn one verification's worth of work for an address with no account.
#[tracing::instrument(name = "Verify dummy password hash", skip_all)]
pub(crate) async fn verify_dummy_password_hash(password_candidate: Password) {
    let current_span: tracing::Span = tracing::Span::current();

    let outcome = tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| {
            let dummy = DUMMY_PASSWORD_HASH.as_ref().map_err(Clone::clone)?;
            verify(dummy, password_candidate.as_ref().expose_secret())
        })
    })
    .await
    .map_err(|e| e.to_string())
    .and_then(std::convert::identity);

    if let Err(e) = outcome {
        tracing::warn!(error = %e, "dummy password verification failed");
    }
}
