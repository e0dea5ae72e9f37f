//! Port for signing and verifying stateless access tokens.
use chrono::{DateTime, Utc};

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Failures raised by access-token codecs.
    pub enum AccessTokenError {
        /// The token could not be signed.
        Signing { message: String } => "access token signing failed: {message}",
        /// Signature, issuer, or claim shape did not verify.
        Invalid { message: String } => "access token invalid: {message}",
        /// The token verified but its expiry has passed.
        Expired => "access token expired",
    }
}

/// Signs user ids into compact tokens and reads them back.
///
/// Time is passed in so callers control expiry through their clock.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokenCodec: Send + Sync {
    /// Sign a token for `user_id` issued at `issued_at`.
    fn issue(&self, user_id: &UserId, issued_at: DateTime<Utc>)
    -> Result<String, AccessTokenError>;

    /// Verify `token` and return the subject if it is still valid at `now`.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AccessTokenError>;
}
