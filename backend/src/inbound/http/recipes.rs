//! Recipe API handlers.
//!
//! ```text
//! POST   /api/v1/recipes
//! GET    /api/v1/recipes?limit=20&offset=0
//! GET    /api/v1/recipes/{id}
//! PUT    /api/v1/recipes/{id}
//! DELETE /api/v1/recipes/{id}
//! ```
//!
//! Bodies are validated here; storage then enforces catalog references and
//! step-number uniqueness inside the write transaction.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{
    CatalogEntryId, Error, IngredientLine, Instruction, PageRequest, Recipe, RecipeDetails,
    RecipeId, RecipeRequest, RecipeSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Ingredient line as submitted: the catalog id plus amount and position.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct IngredientInput {
    /// Catalog ingredient id.
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    /// Free-text amount, e.g. "2 cups".
    pub amount: String,
    /// Optional preparation note.
    pub prep_note: Option<String>,
    /// Display position.
    pub index: i32,
}

/// Whole-recipe body for create and update.
///
/// Update replaces every field and collection with what is submitted.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RecipeBody {
    /// Display name.
    pub name: String,
    /// Source link.
    pub external_url: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Number of servings; not negative.
    pub servings: i32,
    /// Free-form yield.
    #[serde(rename = "yield")]
    pub yield_amount: Option<String>,
    /// Cook time in minutes; not negative.
    pub cook_time_in_minutes: i32,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Cuisine catalog ids.
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub cuisines: Vec<Uuid>,
    /// Ingredient lines.
    #[serde(default)]
    pub ingredients: Vec<IngredientInput>,
    /// Steps; `step_no` must be positive.
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

fn invalid(message: &str, field: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

impl TryFrom<RecipeBody> for RecipeRequest {
    type Error = Error;

    fn try_from(body: RecipeBody) -> Result<Self, Self::Error> {
        if body.name.trim().is_empty() {
            return Err(invalid("name must not be empty", "name", "empty_name"));
        }
        if body.servings < 0 {
            return Err(invalid(
                "servings must not be negative",
                "servings",
                "negative_servings",
            ));
        }
        if body.cook_time_in_minutes < 0 {
            return Err(invalid(
                "cook time must not be negative",
                "cook_time_in_minutes",
                "negative_cook_time",
            ));
        }
        if body.instructions.iter().any(|step| step.step_no <= 0) {
            return Err(invalid(
                "step numbers must be positive",
                "instructions",
                "non_positive_step",
            ));
        }
        if body
            .ingredients
            .iter()
            .any(|line| line.amount.trim().is_empty())
        {
            return Err(invalid(
                "ingredient amount must not be empty",
                "ingredients",
                "empty_amount",
            ));
        }

        Ok(Self {
            details: RecipeDetails {
                name: body.name,
                external_url: body.external_url,
                description: body.description,
                servings: body.servings,
                yield_amount: body.yield_amount,
                cook_time_in_minutes: body.cook_time_in_minutes,
                notes: body.notes,
            },
            cuisines: body
                .cuisines
                .into_iter()
                .map(CatalogEntryId::from_uuid)
                .collect(),
            ingredients: body
                .ingredients
                .into_iter()
                .map(|line| IngredientLine {
                    ingredient_id: CatalogEntryId::from_uuid(line.id),
                    amount: line.amount,
                    prep_note: line.prep_note,
                    index: line.index,
                })
                .collect(),
            instructions: body.instructions,
        })
    }
}

/// Paging window for `GET /api/v1/recipes`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListRecipesQuery {
    /// Maximum rows; defaults to 20.
    pub limit: Option<i64>,
    /// Rows to skip; defaults to 0.
    pub offset: Option<i64>,
}

pub(crate) fn parse_uuid(raw: &str, field: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| invalid("id must be a UUID", field, "invalid_id"))
}

/// Create a recipe owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeBody,
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Unknown catalog id or duplicate step", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe",
    security(("bearer" = []))
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<RecipeBody>,
) -> ApiResult<HttpResponse> {
    let request = RecipeRequest::try_from(payload.into_inner())?;
    let recipe = state.recipe_writer.create_recipe(user.id(), request).await?;
    Ok(HttpResponse::Created().json(recipe))
}

/// List the caller's recipes ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(ListRecipesQuery),
    responses(
        (status = 200, description = "Recipes", body = [RecipeSummary]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security(("bearer" = []))
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<ListRecipesQuery>,
) -> ApiResult<web::Json<Vec<RecipeSummary>>> {
    let ListRecipesQuery { limit, offset } = query.into_inner();
    let recipes = state
        .recipes
        .list_recipes(user.id(), PageRequest::new(limit, offset))
        .await?;
    Ok(web::Json(recipes))
}

/// Fetch a whole recipe.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = Recipe),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Recipe not found", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security(("bearer" = []))
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Recipe>> {
    let id = RecipeId::from_uuid(parse_uuid(&path, "id")?);
    let recipe = state.recipes.get_recipe(&id).await?;
    Ok(web::Json(recipe))
}

/// Replace a recipe the caller owns.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = RecipeBody,
    responses(
        (status = 200, description = "Updated recipe", body = Recipe),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised or not the owner", body = Error),
        (status = 403, description = "Unknown catalog id or duplicate step", body = Error),
        (status = 404, description = "Recipe not found", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe",
    security(("bearer" = []))
)]
#[put("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<RecipeBody>,
) -> ApiResult<web::Json<Recipe>> {
    let id = RecipeId::from_uuid(parse_uuid(&path, "id")?);
    let request = RecipeRequest::try_from(payload.into_inner())?;
    let recipe = state
        .recipe_writer
        .update_recipe(user.id(), &id, request)
        .await?;
    Ok(web::Json(recipe))
}

/// Delete a recipe the caller owns.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised or not the owner", body = Error),
        (status = 404, description = "Recipe not found", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe",
    security(("bearer" = []))
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = RecipeId::from_uuid(parse_uuid(&path, "id")?);
    state.recipe_writer.delete_recipe(user.id(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
