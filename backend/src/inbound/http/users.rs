//! Account API handlers.
//!
//! ```text
//! POST   /api/v1/users {"email":"cook@example.com","password":"correct horse"}
//! PUT    /api/v1/users {"password":"new password","confirm_password":"new password"}
//! DELETE /api/v1/users
//! ```

use actix_web::{HttpResponse, delete, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    CredentialValidationError, Error, LoginCredentials, Password, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tokens::LoginResponse;

/// Registration body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Login email; must contain `@`.
    pub email: String,
    /// Password of at least eight characters.
    pub password: String,
    /// Optional repeat of `password`; must match when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

/// Body for `PUT /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ChangePasswordRequest {
    /// Replacement password.
    pub password: String,
    /// Optional repeat of `password`; must match when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

pub(crate) fn map_credential_error(err: CredentialValidationError) -> Error {
    let (field, code) = match &err {
        CredentialValidationError::Email(UserValidationError::EmptyEmail) => {
            ("email", "empty_email")
        }
        CredentialValidationError::Email(_) => ("email", "invalid_email"),
        CredentialValidationError::PasswordTooShort { .. } => ("password", "password_too_short"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn ensure_confirmed(password: &str, confirm: Option<&str>) -> ApiResult<()> {
    match confirm {
        Some(repeat) if repeat != password => Err(Error::invalid_request("passwords do not match")
            .with_details(json!({ "field": "confirm_password", "code": "password_mismatch" }))),
        _ => Ok(()),
    }
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Email already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        password,
        confirm_password,
    } = payload.into_inner();
    ensure_confirmed(&password, confirm_password.as_deref())?;
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_credential_error)?;
    let session = state.accounts.register(credentials).await?;
    Ok(HttpResponse::Created().json(LoginResponse::from(session)))
}

/// Replace the caller's password.
#[utoipa::path(
    put,
    path = "/api/v1/users",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["users"],
    operation_id = "changePassword",
    security(("bearer" = []))
)]
#[put("/users")]
pub async fn change_password(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let ChangePasswordRequest {
        password,
        confirm_password,
    } = payload.into_inner();
    ensure_confirmed(&password, confirm_password.as_deref())?;
    let password = Password::new(&password).map_err(map_credential_error)?;
    state.accounts.change_password(user.id(), password).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete the caller's account with its recipes and tokens.
#[utoipa::path(
    delete,
    path = "/api/v1/users",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteAccount",
    security(("bearer" = []))
)]
#[delete("/users")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    state.accounts.delete_account(user.id()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
