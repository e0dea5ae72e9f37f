//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email.
        DuplicateEmail => "email already registered",
    }
}

/// User row paired with its credential hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentialsRecord {
    /// Public user fields.
    pub user: User,
    /// Salted password hash.
    pub password_hash: String,
}

/// Storage for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    async fn create(&self, record: &UserCredentialsRecord) -> Result<(), UserRepositoryError>;

    /// Fetch an account by login email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentialsRecord>, UserRepositoryError>;

    /// Replace the credential hash. Returns whether the user exists.
    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, UserRepositoryError>;

    /// Delete an account; owned rows cascade in storage. Returns whether the
    /// user existed.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;
}
