//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed recipe, catalog, and account model,
//! the pure reconcilers that diff desired state against stored state, and the
//! services that orchestrate them behind the port traits in [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — transport-agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Recipe / RecipeSummary — aggregate read views.
//! - reconcile_links / reconcile_instructions — pure diff algorithms.
//! - RecipeService, TokenService, AccountService, CatalogService.

pub mod account_service;
pub mod auth;
pub mod catalog;
pub mod catalog_service;
pub mod error;
pub mod ports;
pub mod recipe;
pub mod recipe_service;
pub mod reconcile;
pub mod token_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, LOGIN_REJECTED};
pub use self::auth::{
    CredentialValidationError, LoginCredentials, PASSWORD_MIN_CHARS, Password, RefreshToken,
    TokenPair, UserSession,
};
pub use self::catalog::{CatalogDraft, CatalogEntry, CatalogKind, CatalogValidationError};
pub use self::catalog_service::CatalogService;
pub use self::error::{CONSTRAINT_VIOLATION_MESSAGE, Error, ErrorCode};
pub use self::recipe::{
    CatalogEntryId, CuisineLink, DEFAULT_PAGE_LIMIT, IngredientLine, IngredientLink, Instruction,
    PageRequest, Recipe, RecipeDetails, RecipeId, RecipeRequest, RecipeSummary,
};
pub use self::recipe_service::RecipeService;
pub use self::reconcile::{InstructionPlan, LinkDiff, reconcile_instructions, reconcile_links};
pub use self::token_service::{
    DEFAULT_REFRESH_TOKEN_TTL_DAYS, REFRESH_TOKEN_BYTES, TokenService,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, User, UserId, UserValidationError};
