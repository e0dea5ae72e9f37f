//! Driving port for recipe mutation use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Recipe, RecipeId, RecipeRequest, UserId};

/// Atomic create, update, and delete of recipe aggregates.
///
/// Each call either applies every write or none of them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeWriter: Send + Sync {
    /// Create a recipe owned by `owner`.
    async fn create_recipe(&self, owner: &UserId, request: RecipeRequest)
    -> Result<Recipe, Error>;

    /// Replace a recipe owned by `owner` with the submitted state.
    async fn update_recipe(
        &self,
        owner: &UserId,
        id: &RecipeId,
        request: RecipeRequest,
    ) -> Result<Recipe, Error>;

    /// Delete a recipe owned by `owner`.
    async fn delete_recipe(&self, owner: &UserId, id: &RecipeId) -> Result<(), Error>;
}
