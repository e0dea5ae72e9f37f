//! Login and token endpoints.
//!
//! Refresh and revoke take the refresh token as a bearer credential, not in
//! the body.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, LOGIN_REJECTED, LoginCredentials, User, UserSession};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerToken;
use crate::inbound::http::state::HttpState;

/// Login body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// The account and its new tokens, returned by login and registration.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    /// The signed-in account.
    #[serde(flatten)]
    pub user: User,
    /// Short-lived access token.
    pub token: String,
    /// Long-lived opaque refresh token.
    pub refresh_token: String,
}

impl From<UserSession> for LoginResponse {
    fn from(session: UserSession) -> Self {
        Self {
            user: session.user,
            token: session.tokens.access_token,
            refresh_token: session.tokens.refresh_token,
        }
    }
}

/// Fresh access token minted from a refresh token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RefreshResponse {
    /// Short-lived access token.
    pub token: String,
}

/// Exchange credentials for an access and refresh token pair.
///
/// Malformed credentials are rejected the same way as wrong ones.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 401, description = "Incorrect email or password", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(|_| Error::unauthorized(LOGIN_REJECTED))?;
    let session = state.accounts.login(credentials).await?;
    Ok(web::Json(LoginResponse::from(session)))
}

/// Mint a new access token from a live refresh token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Refresh token missing, revoked, or expired", body = Error),
        (status = 404, description = "Unknown refresh token", body = Error)
    ),
    tags = ["auth"],
    operation_id = "refreshAccessToken",
    security(("bearer" = []))
)]
#[post("/auth/refresh")]
pub async fn refresh(
    state: web::Data<HttpState>,
    refresh_token: BearerToken,
) -> ApiResult<web::Json<RefreshResponse>> {
    let user_id = state
        .tokens
        .validate_refresh_token(refresh_token.as_str())
        .await?;
    let token = state.tokens.issue_access_token(&user_id)?;
    Ok(web::Json(RefreshResponse { token }))
}

/// Revoke a refresh token. Unknown tokens are accepted.
#[utoipa::path(
    post,
    path = "/api/v1/auth/revoke",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Refresh token missing", body = Error)
    ),
    tags = ["auth"],
    operation_id = "revokeRefreshToken",
    security(("bearer" = []))
)]
#[post("/auth/revoke")]
pub async fn revoke(
    state: web::Data<HttpState>,
    refresh_token: BearerToken,
) -> ApiResult<HttpResponse> {
    state
        .tokens
        .revoke_refresh_token(refresh_token.as_str())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "tokens_tests.rs"]
mod tests;
