//! Credential hashing and access-token signing adapters.

mod argon2_hasher;
mod jwt_codec;

pub use argon2_hasher::Argon2Hasher;
pub use jwt_codec::{DEFAULT_ACCESS_TOKEN_TTL_SECS, DEFAULT_JWT_ISSUER, JwtAccessTokenCodec};
