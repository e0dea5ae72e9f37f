//! Argon2id implementation of the `CredentialHasher` port.

use argon2::Argon2;
use argon2::password_hash::{
    Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use rand::rngs::OsRng;

use crate::domain::Password;
use crate::domain::ports::{CredentialHashError, CredentialHasher};

/// Hashes passwords with Argon2id and a per-hash random salt.
///
/// Hashes are stored in PHC string format, so parameters travel with them.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    /// Hasher with the library's recommended parameters.
    pub const fn new() -> Self {
        Self
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &Password) -> Result<String, CredentialHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| CredentialHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &Password, hash: &str) -> Result<bool, CredentialHashError> {
        let parsed =
            PasswordHash::new(hash).map_err(|err| CredentialHashError::hash(err.to_string()))?;
        match Argon2::default().verify_password(password.expose().as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(err) => Err(CredentialHashError::hash(err.to_string())),
        }
    }
}
