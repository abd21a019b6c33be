use std::fmt;
use std::str::FromStr;

/// What a verification token is allowed to prove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenScope {
    Registration,
    ChangeEmail,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown token scope: {0}")]
pub struct UnknownScope(String);

impl TokenScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenScope::Registration => "registration",
            TokenScope::ChangeEmail => "change-email",
        }
    }

    /// Scopes that are only valid together with the user that requested them.
    pub fn requires_owner(&self) -> bool {
        matches!(self, TokenScope::ChangeEmail)
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenScope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registration" => Ok(TokenScope::Registration),
            "change-email" => Ok(TokenScope::ChangeEmail),
            other => Err(UnknownScope(other.to_string())),
        }
    }
}
