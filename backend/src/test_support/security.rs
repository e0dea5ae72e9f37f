//! Deterministic stand-ins for the password hasher and token signer.

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::ports::{
    AccessTokenCodec, AccessTokenError, CredentialHashError, CredentialHasher,
};
use crate::domain::{Password, UserId};

const PLAIN_PREFIX: &str = "plain$";

/// Stores passwords with a fixed prefix instead of a salted hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextHasher;

impl CredentialHasher for PlainTextHasher {
    fn hash(&self, password: &Password) -> Result<String, CredentialHashError> {
        Ok(format!("{PLAIN_PREFIX}{}", password.expose()))
    }

    fn verify(&self, password: &Password, hash: &str) -> Result<bool, CredentialHashError> {
        let stored = hash
            .strip_prefix(PLAIN_PREFIX)
            .ok_or_else(|| CredentialHashError::hash("unrecognised hash format"))?;
        Ok(stored == password.expose())
    }
}

/// Unsigned `user_id:issued_at` tokens with a fixed lifetime.
#[derive(Debug, Clone, Copy)]
pub struct StaticTokenCodec {
    ttl: TimeDelta,
}

impl StaticTokenCodec {
    /// Tokens expire `ttl` after issue.
    pub const fn new(ttl: TimeDelta) -> Self {
        Self { ttl }
    }
}

impl Default for StaticTokenCodec {
    fn default() -> Self {
        Self::new(TimeDelta::hours(1))
    }
}

impl AccessTokenCodec for StaticTokenCodec {
    fn issue(
        &self,
        user_id: &UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AccessTokenError> {
        Ok(format!("{user_id}:{}", issued_at.timestamp()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AccessTokenError> {
        let (subject, issued) = token
            .split_once(':')
            .ok_or_else(|| AccessTokenError::invalid("malformed token"))?;
        let user_id =
            UserId::new(subject).map_err(|err| AccessTokenError::invalid(err.to_string()))?;
        let issued_at = issued
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .ok_or_else(|| AccessTokenError::invalid("malformed issue time"))?;
        if issued_at + self.ttl < now {
            return Err(AccessTokenError::expired());
        }
        Ok(user_id)
    }
}
