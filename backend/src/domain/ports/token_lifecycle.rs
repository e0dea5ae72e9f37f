//! Driving port for access and refresh token use-cases.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// Issues, validates, and revokes credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenLifecycle: Send + Sync {
    /// Sign a short-lived access token for `user_id`.
    fn issue_access_token(&self, user_id: &UserId) -> Result<String, Error>;

    /// Verify an access token and return its subject.
    fn verify_access_token(&self, token: &str) -> Result<UserId, Error>;

    /// Generate, persist, and return a long-lived refresh token.
    async fn issue_refresh_token(&self, user_id: &UserId) -> Result<String, Error>;

    /// Return the owner of a live refresh token, revoking it lazily if it has
    /// expired.
    async fn validate_refresh_token(&self, value: &str) -> Result<UserId, Error>;

    /// Revoke a refresh token. Unknown values succeed.
    async fn revoke_refresh_token(&self, value: &str) -> Result<(), Error>;
}
