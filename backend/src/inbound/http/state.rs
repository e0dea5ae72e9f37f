//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, CatalogCommand, CatalogQuery, RecipeReader, RecipeWriter, TokenLifecycle,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Access and refresh token use-cases; also verifies bearer tokens.
    pub tokens: Arc<dyn TokenLifecycle>,
    /// Registration, login, and account maintenance.
    pub accounts: Arc<dyn AccountCommand>,
    /// Recipe reads.
    pub recipes: Arc<dyn RecipeReader>,
    /// Recipe mutations.
    pub recipe_writer: Arc<dyn RecipeWriter>,
    /// Catalog mutations.
    pub catalog: Arc<dyn CatalogCommand>,
    /// Catalog reads.
    pub catalog_query: Arc<dyn CatalogQuery>,
}
