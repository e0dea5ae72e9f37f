//! Persistence gateway for the recipe aggregate.
//!
//! Every method maps to a single SQL statement. Multi-statement work happens
//! inside a [`RecipeTransaction`] obtained from [`RecipeStore::begin`]; the
//! caller decides when to commit or roll back. Dropping an unfinished
//! transaction must never commit it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    CatalogEntryId, CuisineLink, IngredientLine, IngredientLink, Instruction, PageRequest,
    RecipeDetails, RecipeId, RecipeSummary, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by recipe store adapters.
    pub enum RecipeStoreError {
        /// Store connection could not be established or was lost.
        Connection { message: String } => "recipe store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe store query failed: {message}",
        /// A uniqueness, foreign-key, or check constraint rejected a write.
        Constraint { message: String } => "recipe store constraint violated: {message}",
    }
}

/// Access mode requested when opening a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionAccess {
    /// Reads and writes.
    ReadWrite,
    /// Reads only; isolates multi-statement reads from concurrent writers.
    ReadOnly,
}

/// Host row written when a recipe is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipeRow {
    /// Freshly generated identifier.
    pub id: RecipeId,
    /// Owner of the recipe.
    pub user_id: UserId,
    /// Host-record fields.
    pub details: RecipeDetails,
    /// Used for both `created_at` and `updated_at`.
    pub now: DateTime<Utc>,
}

/// Entry point to recipe persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Open a transaction holding one pooled connection until it finishes.
    async fn begin(
        &self,
        access: TransactionAccess,
    ) -> Result<Box<dyn RecipeTransaction>, RecipeStoreError>;

    /// Fetch a host row outside any transaction.
    async fn find_recipe(&self, id: &RecipeId) -> Result<Option<RecipeSummary>, RecipeStoreError>;

    /// Page through an owner's recipes ordered by name.
    async fn list_recipes_by_owner(
        &self,
        owner: &UserId,
        page: PageRequest,
    ) -> Result<Vec<RecipeSummary>, RecipeStoreError>;

    /// Delete a recipe scoped by owner and id; dependents cascade in storage.
    ///
    /// Returns whether a row was deleted.
    async fn delete_recipe(&self, owner: &UserId, id: &RecipeId)
    -> Result<bool, RecipeStoreError>;
}

/// Statements available inside an open recipe transaction.
///
/// Reads observe writes made earlier in the same transaction.
#[async_trait]
pub trait RecipeTransaction: Send {
    /// Insert the host row and return it as stored.
    async fn insert_recipe(&mut self, row: &NewRecipeRow)
    -> Result<RecipeSummary, RecipeStoreError>;

    /// Replace the host fields and return the stored row, if it still exists.
    async fn update_recipe(
        &mut self,
        id: &RecipeId,
        details: &RecipeDetails,
        now: DateTime<Utc>,
    ) -> Result<Option<RecipeSummary>, RecipeStoreError>;

    /// Fetch the host row.
    async fn find_recipe(
        &mut self,
        id: &RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipeStoreError>;

    /// Link one cuisine.
    async fn add_cuisine_link(
        &mut self,
        recipe_id: &RecipeId,
        cuisine_id: &CatalogEntryId,
        now: DateTime<Utc>,
    ) -> Result<(), RecipeStoreError>;

    /// Unlink one cuisine.
    async fn remove_cuisine_link(
        &mut self,
        recipe_id: &RecipeId,
        cuisine_id: &CatalogEntryId,
    ) -> Result<(), RecipeStoreError>;

    /// Linked cuisines joined with catalog names, ordered by name.
    async fn list_cuisine_links(
        &mut self,
        recipe_id: &RecipeId,
    ) -> Result<Vec<CuisineLink>, RecipeStoreError>;

    /// Link all ingredient lines in one multi-row insert.
    async fn add_ingredient_links(
        &mut self,
        recipe_id: &RecipeId,
        lines: &[IngredientLine],
        now: DateTime<Utc>,
    ) -> Result<(), RecipeStoreError>;

    /// Unlink every ingredient of the recipe.
    async fn remove_ingredient_links(&mut self, recipe_id: &RecipeId)
    -> Result<(), RecipeStoreError>;

    /// Linked ingredients joined with catalog names, ordered by index.
    async fn list_ingredient_links(
        &mut self,
        recipe_id: &RecipeId,
    ) -> Result<Vec<IngredientLink>, RecipeStoreError>;

    /// Insert one instruction.
    async fn add_instruction(
        &mut self,
        recipe_id: &RecipeId,
        instruction: &Instruction,
        now: DateTime<Utc>,
    ) -> Result<(), RecipeStoreError>;

    /// Replace the text of an existing step.
    async fn update_instruction(
        &mut self,
        recipe_id: &RecipeId,
        instruction: &Instruction,
        now: DateTime<Utc>,
    ) -> Result<(), RecipeStoreError>;

    /// Delete one step.
    async fn delete_instruction(
        &mut self,
        recipe_id: &RecipeId,
        step_no: i32,
    ) -> Result<(), RecipeStoreError>;

    /// Instructions ordered by step number.
    async fn list_instructions(
        &mut self,
        recipe_id: &RecipeId,
    ) -> Result<Vec<Instruction>, RecipeStoreError>;

    /// Make every write durable and release the connection.
    async fn commit(self: Box<Self>) -> Result<(), RecipeStoreError>;

    /// Discard every write and release the connection.
    async fn rollback(self: Box<Self>) -> Result<(), RecipeStoreError>;
}
