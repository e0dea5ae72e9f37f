//! Authentication primitives: credentials and refresh tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::{EmailAddress, User, UserId, UserValidationError};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Email was missing or malformed.
    Email(UserValidationError),
    /// Password was shorter than [`PASSWORD_MIN_CHARS`].
    PasswordTooShort {
        /// Required minimum length.
        min: usize,
    },
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => err.fmt(f),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Plain-text password held in zeroising memory.
///
/// ## Invariants
/// - At least [`PASSWORD_MIN_CHARS`] characters.
/// - Whitespace is preserved to avoid surprising credential comparisons.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a candidate password.
    pub fn new(raw: &str) -> Result<Self, CredentialValidationError> {
        if raw.chars().count() < PASSWORD_MIN_CHARS {
            return Err(CredentialValidationError::PasswordTooShort {
                min: PASSWORD_MIN_CHARS,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the secret for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Validated email/password pair used for login and registration.
///
/// # Examples
/// ```
/// use mealbook::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Cook@Example.com", "correct horse")
///     .expect("valid credentials");
/// assert_eq!(creds.email().as_str(), "cook@example.com");
/// assert_eq!(creds.password().expose(), "correct horse");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let parsed_email = EmailAddress::new(email).map_err(CredentialValidationError::Email)?;
        let parsed_password = Password::new(password)?;
        Ok(Self {
            email: parsed_email,
            password: parsed_password,
        })
    }

    /// Email used for the user lookup.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password supplied by the caller.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }
}

/// Persisted refresh token.
///
/// The opaque `value` is the lookup key. Tokens are soft-revoked only;
/// `revoked` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    /// Opaque base64 token string.
    pub value: String,
    /// Owning user.
    pub user_id: UserId,
    /// Issue time.
    pub created_at: DateTime<Utc>,
    /// Expiry time.
    pub expired_at: DateTime<Utc>,
    /// Set once the token is revoked explicitly or presented after expiry.
    pub revoked: bool,
}

impl RefreshToken {
    /// Whether the token's expiry lies strictly before `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expired_at < now
    }
}

/// Access and refresh token pair returned after login.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Signed short-lived access token.
    pub access_token: String,
    /// Opaque long-lived refresh token.
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair").finish_non_exhaustive()
    }
}

/// A user together with freshly minted credentials, returned by registration
/// and login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    /// The authenticated account.
    pub user: User,
    /// Credentials issued for this session.
    pub tokens: TokenPair,
}
