//! HS256 JWT implementation of the `AccessTokenCodec` port.
//!
//! Tokens carry `iss`, `iat`, `exp` and `sub` claims. Expiry is checked
//! against the caller's clock rather than the system time, so the library's
//! own `exp` validation is disabled.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::domain::ports::{AccessTokenCodec, AccessTokenError};

/// Issuer claim used when none is configured.
pub const DEFAULT_JWT_ISSUER: &str = "meal_planner";

/// Access token lifetime used when none is configured.
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies access tokens with a shared secret.
pub struct JwtAccessTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: TimeDelta,
}

impl JwtAccessTokenCodec {
    /// Codec for `secret` and `issuer` with the default lifetime.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use mealbook::domain::UserId;
    /// use mealbook::domain::ports::AccessTokenCodec;
    /// use mealbook::outbound::security::JwtAccessTokenCodec;
    ///
    /// let codec = JwtAccessTokenCodec::new(b"kitchen-secret", "meal_planner");
    /// let user = UserId::random();
    /// let now = Utc
    ///     .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
    ///     .single()
    ///     .expect("valid timestamp");
    /// let token = codec.issue(&user, now).expect("signed");
    /// assert_eq!(codec.verify(&token, now).expect("verified"), user);
    /// ```
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            issuer,
            ttl: TimeDelta::seconds(DEFAULT_ACCESS_TOKEN_TTL_SECS),
        }
    }

    /// Override the token lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }
}

impl AccessTokenCodec for JwtAccessTokenCodec {
    fn issue(
        &self,
        user_id: &UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AccessTokenError> {
        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| AccessTokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AccessTokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| AccessTokenError::invalid(err.to_string()))?;
        if data.claims.exp < now.timestamp() {
            return Err(AccessTokenError::expired());
        }
        UserId::new(&data.claims.sub).map_err(|err| AccessTokenError::invalid(err.to_string()))
    }
}
