//! Port abstraction for refresh-token persistence.
use async_trait::async_trait;

use crate::domain::RefreshToken;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by refresh-token repository adapters.
    pub enum RefreshTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "refresh token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "refresh token repository query failed: {message}",
    }
}

/// Storage for opaque refresh tokens keyed by their value.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Persist a newly issued token.
    async fn save(&self, token: &RefreshToken) -> Result<(), RefreshTokenRepositoryError>;

    /// Look a token up by its value.
    async fn find_by_value(
        &self,
        value: &str,
    ) -> Result<Option<RefreshToken>, RefreshTokenRepositoryError>;

    /// Set the revoked flag. Unknown values are ignored.
    async fn mark_revoked(&self, value: &str) -> Result<(), RefreshTokenRepositoryError>;
}
