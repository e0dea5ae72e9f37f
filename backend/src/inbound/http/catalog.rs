//! Cuisine and ingredient catalog handlers.
//!
//! ```text
//! GET    /api/v1/cuisines
//! POST   /api/v1/cuisines
//! PUT    /api/v1/cuisines/{id}
//! DELETE /api/v1/cuisines/{id}
//! ```
//!
//! `/api/v1/ingredients` mirrors the cuisine routes.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    CatalogDraft, CatalogEntry, CatalogEntryId, CatalogKind, CatalogValidationError, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::recipes::parse_uuid;
use crate::inbound::http::state::HttpState;

/// Body for creating or renaming a catalog entry.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CatalogBody {
    /// Display name; trimmed.
    pub name: String,
    /// Optional parent entry in the same catalog.
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub parent_id: Option<Uuid>,
}

fn map_validation_error(err: CatalogValidationError) -> Error {
    let (field, code) = match err {
        CatalogValidationError::EmptyName => ("name", "empty_name"),
        CatalogValidationError::SelfParent => ("parent_id", "self_parent"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

impl TryFrom<CatalogBody> for CatalogDraft {
    type Error = Error;

    fn try_from(body: CatalogBody) -> Result<Self, Self::Error> {
        Self::new(&body.name, body.parent_id.map(CatalogEntryId::from_uuid))
            .map_err(map_validation_error)
    }
}

fn entry_id(raw: &str) -> ApiResult<CatalogEntryId> {
    parse_uuid(raw, "id").map(CatalogEntryId::from_uuid)
}

async fn list(state: &HttpState, kind: CatalogKind) -> ApiResult<web::Json<Vec<CatalogEntry>>> {
    Ok(web::Json(state.catalog_query.list_entries(kind).await?))
}

async fn create(state: &HttpState, kind: CatalogKind, body: CatalogBody) -> ApiResult<HttpResponse> {
    let draft = CatalogDraft::try_from(body)?;
    let entry = state.catalog.create_entry(kind, draft).await?;
    Ok(HttpResponse::Created().json(entry))
}

async fn update(
    state: &HttpState,
    kind: CatalogKind,
    raw_id: &str,
    body: CatalogBody,
) -> ApiResult<web::Json<CatalogEntry>> {
    let id = entry_id(raw_id)?;
    let draft = CatalogDraft::try_from(body)?;
    Ok(web::Json(state.catalog.update_entry(kind, &id, draft).await?))
}

async fn remove(state: &HttpState, kind: CatalogKind, raw_id: &str) -> ApiResult<HttpResponse> {
    let id = entry_id(raw_id)?;
    state.catalog.delete_entry(kind, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List cuisines ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/cuisines",
    responses(
        (status = 200, description = "Cuisines", body = [CatalogEntry]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "listCuisines",
    security(("bearer" = []))
)]
#[get("/cuisines")]
pub async fn list_cuisines(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<CatalogEntry>>> {
    list(&state, CatalogKind::Cuisine).await
}

/// Create a cuisine.
#[utoipa::path(
    post,
    path = "/api/v1/cuisines",
    request_body = CatalogBody,
    responses(
        (status = 201, description = "Cuisine created", body = CatalogEntry),
        (status = 400, description = "Invalid name or unknown parent", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "createCuisine",
    security(("bearer" = []))
)]
#[post("/cuisines")]
pub async fn create_cuisine(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    payload: web::Json<CatalogBody>,
) -> ApiResult<HttpResponse> {
    create(&state, CatalogKind::Cuisine, payload.into_inner()).await
}

/// Rename or re-parent a cuisine.
#[utoipa::path(
    put,
    path = "/api/v1/cuisines/{id}",
    params(("id" = String, Path, description = "Cuisine id")),
    request_body = CatalogBody,
    responses(
        (status = 200, description = "Cuisine updated", body = CatalogEntry),
        (status = 400, description = "Invalid name or parent", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Cuisine not found", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "updateCuisine",
    security(("bearer" = []))
)]
#[put("/cuisines/{id}")]
pub async fn update_cuisine(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<CatalogBody>,
) -> ApiResult<web::Json<CatalogEntry>> {
    update(&state, CatalogKind::Cuisine, &path, payload.into_inner()).await
}

/// Delete an unreferenced cuisine.
#[utoipa::path(
    delete,
    path = "/api/v1/cuisines/{id}",
    params(("id" = String, Path, description = "Cuisine id")),
    responses(
        (status = 204, description = "Cuisine deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Cuisine still referenced", body = Error),
        (status = 404, description = "Cuisine not found", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "deleteCuisine",
    security(("bearer" = []))
)]
#[delete("/cuisines/{id}")]
pub async fn delete_cuisine(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove(&state, CatalogKind::Cuisine, &path).await
}

/// List ingredients ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    responses(
        (status = 200, description = "Ingredients", body = [CatalogEntry]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "listIngredients",
    security(("bearer" = []))
)]
#[get("/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<CatalogEntry>>> {
    list(&state, CatalogKind::Ingredient).await
}

/// Create an ingredient.
#[utoipa::path(
    post,
    path = "/api/v1/ingredients",
    request_body = CatalogBody,
    responses(
        (status = 201, description = "Ingredient created", body = CatalogEntry),
        (status = 400, description = "Invalid name or unknown parent", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "createIngredient",
    security(("bearer" = []))
)]
#[post("/ingredients")]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    payload: web::Json<CatalogBody>,
) -> ApiResult<HttpResponse> {
    create(&state, CatalogKind::Ingredient, payload.into_inner()).await
}

/// Rename or re-parent an ingredient.
#[utoipa::path(
    put,
    path = "/api/v1/ingredients/{id}",
    params(("id" = String, Path, description = "Ingredient id")),
    request_body = CatalogBody,
    responses(
        (status = 200, description = "Ingredient updated", body = CatalogEntry),
        (status = 400, description = "Invalid name or parent", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Ingredient not found", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "updateIngredient",
    security(("bearer" = []))
)]
#[put("/ingredients/{id}")]
pub async fn update_ingredient(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<CatalogBody>,
) -> ApiResult<web::Json<CatalogEntry>> {
    update(&state, CatalogKind::Ingredient, &path, payload.into_inner()).await
}

/// Delete an unreferenced ingredient.
#[utoipa::path(
    delete,
    path = "/api/v1/ingredients/{id}",
    params(("id" = String, Path, description = "Ingredient id")),
    responses(
        (status = 204, description = "Ingredient deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Ingredient still referenced", body = Error),
        (status = 404, description = "Ingredient not found", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "deleteIngredient",
    security(("bearer" = []))
)]
#[delete("/ingredients/{id}")]
pub async fn delete_ingredient(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove(&state, CatalogKind::Ingredient, &path).await
}
