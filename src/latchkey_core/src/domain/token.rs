//! Opaque bearer tokens.
//!
//! A token is 16 random bytes rendered as unpadded base-32. Only the SHA-256
//! digest of the plaintext is ever persisted; the plaintext lives in memory
//! and in the outbound notification. The digest is unsalted: the plaintext
//! already carries 128 bits of entropy and every token is single-purpose.

use base32::Alphabet;
use chrono::{DateTime, Duration, Utc};
use rand::{TryRngCore, rngs::OsRng};
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};

const TOKEN_ENTROPY_BYTES: usize = 16;
const TOKEN_ALPHABET: Alphabet = Alphabet::Rfc4648 { padding: false };

/// Length of an encoded plaintext token.
pub const TOKEN_PLAINTEXT_LEN: usize = 26;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Entropy source failure: {0}")]
    Entropy(String),
}

/// SHA-256 digest of a plaintext token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenHash([u8; 32]);

impl TokenHash {
    pub fn of(plaintext: &str) -> Self {
        Self(Sha256::digest(plaintext.as_bytes()).into())
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    plaintext: Secret<String>,
    hash: TokenHash,
    expiry: DateTime<Utc>,
}

impl Token {
    /// Mint a fresh token that expires `ttl` from now.
    pub fn generate(ttl: Duration) -> Result<Self, TokenError> {
        let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TokenError::Entropy(e.to_string()))?;

        let plaintext = base32::encode(TOKEN_ALPHABET, &bytes);
        let hash = TokenHash::of(&plaintext);

        Ok(Self {
            plaintext: Secret::new(plaintext),
            hash,
            expiry: Utc::now() + ttl,
        })
    }

    /// Cheap shape check so obviously malformed input never reaches a store.
    pub fn looks_valid(plaintext: &str) -> bool {
        plaintext.len() == TOKEN_PLAINTEXT_LEN
            && plaintext
                .bytes()
                .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
    }

    pub fn plaintext(&self) -> &Secret<String> {
        &self.plaintext
    }

    pub fn hash(&self) -> TokenHash {
        self.hash
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    /// Overrides the expiry. Used to seed stores with already-expired tokens.
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        is_expired(self.expiry, now)
    }
}

/// A token stops being valid strictly after its expiry instant.
pub fn is_expired(expiry: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > expiry
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.expiry == other.expiry
            && self.plaintext.expose_secret() == other.plaintext.expose_secret()
    }
}
