//! Access and refresh token lifecycle.
//!
//! Access tokens are stateless and verified by the codec alone. Refresh tokens
//! are opaque random strings persisted with an expiry and a revoked flag.
//! Expiry is enforced lazily: an expired token is revoked the first time it is
//! presented, and one that is never presented again stays active in storage.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::TimeDelta;
use mockable::Clock;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::info;

use crate::domain::ports::{
    AccessTokenCodec, AccessTokenError, RefreshTokenRepository, RefreshTokenRepositoryError,
    TokenLifecycle,
};
use crate::domain::{Error, RefreshToken, UserId};

/// Number of random bytes in a refresh token before encoding.
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Default refresh-token lifetime.
pub const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// Token service implementing [`TokenLifecycle`].
#[derive(Clone)]
pub struct TokenService<R> {
    refresh_tokens: Arc<R>,
    codec: Arc<dyn AccessTokenCodec>,
    clock: Arc<dyn Clock>,
    refresh_ttl: TimeDelta,
}

impl<R> TokenService<R> {
    /// Create a service issuing refresh tokens valid for
    /// [`DEFAULT_REFRESH_TOKEN_TTL_DAYS`].
    pub fn new(
        refresh_tokens: Arc<R>,
        codec: Arc<dyn AccessTokenCodec>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            refresh_tokens,
            codec,
            clock,
            refresh_ttl: TimeDelta::days(DEFAULT_REFRESH_TOKEN_TTL_DAYS),
        }
    }

    /// Override the refresh-token lifetime.
    #[must_use]
    pub fn with_refresh_ttl(mut self, refresh_ttl: TimeDelta) -> Self {
        self.refresh_ttl = refresh_ttl;
        self
    }
}

fn map_repository_error(error: RefreshTokenRepositoryError) -> Error {
    match error {
        RefreshTokenRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("refresh token store unavailable: {message}"))
        }
        RefreshTokenRepositoryError::Query { message } => {
            Error::internal(format!("refresh token store error: {message}"))
        }
    }
}

/// Fresh opaque refresh-token value from the OS random source.
fn generate_refresh_value() -> String {
    let mut bytes = [0_u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}

#[async_trait]
impl<R> TokenLifecycle for TokenService<R>
where
    R: RefreshTokenRepository,
{
    fn issue_access_token(&self, user_id: &UserId) -> Result<String, Error> {
        self.codec
            .issue(user_id, self.clock.utc())
            .map_err(|err| Error::internal(err.to_string()))
    }

    fn verify_access_token(&self, token: &str) -> Result<UserId, Error> {
        self.codec
            .verify(token, self.clock.utc())
            .map_err(|err| match err {
                AccessTokenError::Expired => Error::unauthorized("access token expired"),
                AccessTokenError::Invalid { .. } | AccessTokenError::Signing { .. } => {
                    Error::unauthorized("access token invalid")
                }
            })
    }

    async fn issue_refresh_token(&self, user_id: &UserId) -> Result<String, Error> {
        let now = self.clock.utc();
        let token = RefreshToken {
            value: generate_refresh_value(),
            user_id: *user_id,
            created_at: now,
            expired_at: now + self.refresh_ttl,
            revoked: false,
        };
        self.refresh_tokens
            .save(&token)
            .await
            .map_err(map_repository_error)?;
        Ok(token.value)
    }

    async fn validate_refresh_token(&self, value: &str) -> Result<UserId, Error> {
        let token = self
            .refresh_tokens
            .find_by_value(value)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("refresh token not found"))?;

        if token.is_expired_at(self.clock.utc()) {
            self.refresh_tokens
                .mark_revoked(value)
                .await
                .map_err(map_repository_error)?;
            info!(user_id = %token.user_id, "revoked expired refresh token on use");
            return Err(Error::token_invalid("refresh token expired"));
        }
        if token.revoked {
            return Err(Error::token_invalid("refresh token revoked"));
        }
        Ok(token.user_id)
    }

    async fn revoke_refresh_token(&self, value: &str) -> Result<(), Error> {
        let found = self
            .refresh_tokens
            .find_by_value(value)
            .await
            .map_err(map_repository_error)?;
        if found.is_none() {
            return Ok(());
        }
        self.refresh_tokens
            .mark_revoked(value)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "token_service_tests.rs"]
mod tests;
