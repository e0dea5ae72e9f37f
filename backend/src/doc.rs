//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint from the inbound layer together
//! with the domain and DTO schemas they reference, plus the bearer token
//! security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` exports it for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    CatalogEntry, CatalogKind, CuisineLink, Error, ErrorCode, IngredientLink, Instruction, Recipe,
    RecipeDetails, RecipeSummary, User,
};
use crate::inbound::http::catalog::CatalogBody;
use crate::inbound::http::recipes::{IngredientInput, RecipeBody};
use crate::inbound::http::tokens::{LoginRequest, LoginResponse, RefreshResponse};
use crate::inbound::http::users::{ChangePasswordRequest, RegisterRequest};

/// Adds the access token security scheme referenced by authenticated paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token from POST /api/v1/auth/login or /api/v1/auth/refresh.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Mealbook API",
        description = "Recipe management with bearer-token authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::change_password,
        crate::inbound::http::users::delete_account,
        crate::inbound::http::tokens::login,
        crate::inbound::http::tokens::refresh,
        crate::inbound::http::tokens::revoke,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::catalog::list_cuisines,
        crate::inbound::http::catalog::create_cuisine,
        crate::inbound::http::catalog::update_cuisine,
        crate::inbound::http::catalog::delete_cuisine,
        crate::inbound::http::catalog::list_ingredients,
        crate::inbound::http::catalog::create_ingredient,
        crate::inbound::http::catalog::update_ingredient,
        crate::inbound::http::catalog::delete_ingredient,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        RegisterRequest,
        ChangePasswordRequest,
        LoginRequest,
        LoginResponse,
        RefreshResponse,
        RecipeBody,
        IngredientInput,
        Instruction,
        RecipeDetails,
        RecipeSummary,
        Recipe,
        CuisineLink,
        IngredientLink,
        CatalogBody,
        CatalogEntry,
        CatalogKind,
    )),
    tags(
        (name = "users", description = "Account registration and maintenance"),
        (name = "auth", description = "Access and refresh token lifecycle"),
        (name = "recipes", description = "Recipe aggregates"),
        (name = "catalog", description = "Cuisine and ingredient reference data"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
