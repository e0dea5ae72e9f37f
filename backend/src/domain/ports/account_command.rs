//! Driving port for account use-cases.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Password, UserId, UserSession};

/// Registration, login, and account maintenance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account for a previously unused email and sign it in.
    async fn register(&self, credentials: LoginCredentials) -> Result<UserSession, Error>;

    /// Check credentials and mint a token pair.
    async fn login(&self, credentials: LoginCredentials) -> Result<UserSession, Error>;

    /// Replace the caller's password.
    async fn change_password(&self, user_id: &UserId, password: Password) -> Result<(), Error>;

    /// Delete the caller's account and everything it owns.
    async fn delete_account(&self, user_id: &UserId) -> Result<(), Error>;
}
