//! Driving port for recipe read use-cases.
//!
//! Inbound adapters depend on this narrow capability rather than on the
//! concrete service, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Error, PageRequest, Recipe, RecipeId, RecipeSummary, UserId};

/// Read access to recipe aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeReader: Send + Sync {
    /// Load a whole recipe. No ownership check is applied here.
    async fn get_recipe(&self, id: &RecipeId) -> Result<Recipe, Error>;

    /// Page through an owner's recipes ordered by name, without collections.
    async fn list_recipes(
        &self,
        owner: &UserId,
        page: PageRequest,
    ) -> Result<Vec<RecipeSummary>, Error>;
}
