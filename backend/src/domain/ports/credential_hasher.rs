//! Port for salted password hashing.
use crate::domain::Password;

use super::define_port_error;

define_port_error! {
    /// Failures raised by credential hashers.
    pub enum CredentialHashError {
        /// Hashing or hash parsing failed.
        Hash { message: String } => "credential hashing failed: {message}",
    }
}

/// Produces and checks salted password hashes.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    fn hash(&self, password: &Password) -> Result<String, CredentialHashError>;

    /// Whether `password` matches the stored `hash`.
    fn verify(&self, password: &Password, hash: &str) -> Result<bool, CredentialHashError>;
}
