//! Recipe aggregate service.
//!
//! Every mutation runs in a single store transaction: the host row and its
//! three dependent collections are written, re-read inside the same
//! transaction, and the re-read state is what callers get back. Any failing
//! step rolls the whole unit back. Ownership is checked before a transaction
//! is opened so rejected requests never touch the store's write path.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{
    NewRecipeRow, RecipeReader, RecipeStore, RecipeStoreError, RecipeTransaction, RecipeWriter,
    TransactionAccess,
};
use crate::domain::{
    CatalogEntryId, CuisineLink, Error, IngredientLine, IngredientLink, Instruction, PageRequest,
    Recipe, RecipeId, RecipeRequest, RecipeSummary, UserId, reconcile_instructions,
    reconcile_links,
};

/// Recipe aggregate service implementing [`RecipeReader`] and [`RecipeWriter`].
#[derive(Clone)]
pub struct RecipeService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> RecipeService<S> {
    /// Create a new service over `store`.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use mealbook::domain::RecipeService;
    /// # use mealbook::test_support::InMemoryRecipeStore;
    /// let service = RecipeService::new(
    ///     Arc::new(InMemoryRecipeStore::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

fn map_store_error(error: RecipeStoreError) -> Error {
    match error {
        RecipeStoreError::Connection { message } => {
            Error::service_unavailable(format!("recipe store unavailable: {message}"))
        }
        RecipeStoreError::Query { message } => {
            Error::internal(format!("recipe store error: {message}"))
        }
        RecipeStoreError::Constraint { message } => {
            debug!(%message, "recipe write rejected by storage constraint");
            Error::constraint_violation()
        }
    }
}

fn recipe_not_found(id: &RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

impl<S> RecipeService<S>
where
    S: RecipeStore,
{
    async fn begin(&self, access: TransactionAccess) -> Result<Box<dyn RecipeTransaction>, Error> {
        self.store.begin(access).await.map_err(map_store_error)
    }

    /// Commit on success, roll back on failure.
    ///
    /// A failed rollback is logged but the original error is what callers see.
    async fn finish<T>(
        tx: Box<dyn RecipeTransaction>,
        outcome: Result<T, Error>,
    ) -> Result<T, Error> {
        match outcome {
            Ok(value) => {
                tx.commit().await.map_err(map_store_error)?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(error = %rollback_error, "recipe transaction rollback failed");
                }
                Err(error)
            }
        }
    }

    async fn require_owned(&self, owner: &UserId, id: &RecipeId) -> Result<RecipeSummary, Error> {
        let recipe = self
            .store
            .find_recipe(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| recipe_not_found(id))?;
        if !recipe.is_owned_by(owner) {
            return Err(Error::unauthorized("recipe belongs to another user"));
        }
        Ok(recipe)
    }
}

async fn insert_aggregate(
    tx: &mut dyn RecipeTransaction,
    row: &NewRecipeRow,
    request: &RecipeRequest,
) -> Result<Recipe, RecipeStoreError> {
    let summary = tx.insert_recipe(row).await?;
    let id = summary.id;

    for cuisine_id in &request.cuisines {
        tx.add_cuisine_link(&id, cuisine_id, row.now).await?;
    }
    let cuisines = tx.list_cuisine_links(&id).await?;

    tx.add_ingredient_links(&id, &request.ingredients, row.now)
        .await?;
    let ingredients = tx.list_ingredient_links(&id).await?;

    for instruction in &request.instructions {
        tx.add_instruction(&id, instruction, row.now).await?;
    }
    let instructions = tx.list_instructions(&id).await?;

    Ok(Recipe {
        summary,
        cuisines,
        ingredients,
        instructions,
    })
}

async fn sync_cuisines(
    tx: &mut dyn RecipeTransaction,
    id: &RecipeId,
    desired: &[CatalogEntryId],
    now: DateTime<Utc>,
) -> Result<Vec<CuisineLink>, RecipeStoreError> {
    let links = tx.list_cuisine_links(id).await?;
    let current: Vec<CatalogEntryId> = links.iter().map(|link| link.id).collect();
    let diff = reconcile_links(&current, desired);
    if diff.is_empty() {
        return Ok(links);
    }
    for cuisine_id in &diff.to_add {
        tx.add_cuisine_link(id, cuisine_id, now).await?;
    }
    for cuisine_id in &diff.to_remove {
        tx.remove_cuisine_link(id, cuisine_id).await?;
    }
    tx.list_cuisine_links(id).await
}

/// Ingredient links carry mutable per-row attributes, so they are replaced
/// wholesale rather than diffed.
async fn replace_ingredients(
    tx: &mut dyn RecipeTransaction,
    id: &RecipeId,
    lines: &[IngredientLine],
    now: DateTime<Utc>,
) -> Result<Vec<IngredientLink>, RecipeStoreError> {
    tx.remove_ingredient_links(id).await?;
    tx.add_ingredient_links(id, lines, now).await?;
    tx.list_ingredient_links(id).await
}

async fn sync_instructions(
    tx: &mut dyn RecipeTransaction,
    id: &RecipeId,
    desired: &[Instruction],
    now: DateTime<Utc>,
) -> Result<Vec<Instruction>, RecipeStoreError> {
    let current = tx.list_instructions(id).await?;
    let plan = reconcile_instructions(&current, desired);
    for instruction in &plan.to_add {
        tx.add_instruction(id, instruction, now).await?;
    }
    for instruction in &plan.to_update {
        tx.update_instruction(id, instruction, now).await?;
    }
    for step_no in plan.to_delete {
        tx.delete_instruction(id, step_no).await?;
    }
    tx.list_instructions(id).await
}

async fn replace_aggregate(
    tx: &mut dyn RecipeTransaction,
    id: &RecipeId,
    request: &RecipeRequest,
    now: DateTime<Utc>,
) -> Result<Recipe, Error> {
    let summary = tx
        .update_recipe(id, &request.details, now)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| recipe_not_found(id))?;
    let cuisines = sync_cuisines(tx, id, &request.cuisines, now)
        .await
        .map_err(map_store_error)?;
    let ingredients = replace_ingredients(tx, id, &request.ingredients, now)
        .await
        .map_err(map_store_error)?;
    let instructions = sync_instructions(tx, id, &request.instructions, now)
        .await
        .map_err(map_store_error)?;
    Ok(Recipe {
        summary,
        cuisines,
        ingredients,
        instructions,
    })
}

async fn read_aggregate(tx: &mut dyn RecipeTransaction, id: &RecipeId) -> Result<Recipe, Error> {
    let summary = tx
        .find_recipe(id)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| recipe_not_found(id))?;
    let cuisines = tx.list_cuisine_links(id).await.map_err(map_store_error)?;
    let ingredients = tx.list_ingredient_links(id).await.map_err(map_store_error)?;
    let instructions = tx.list_instructions(id).await.map_err(map_store_error)?;
    Ok(Recipe {
        summary,
        cuisines,
        ingredients,
        instructions,
    })
}

#[async_trait]
impl<S> RecipeWriter for RecipeService<S>
where
    S: RecipeStore,
{
    async fn create_recipe(
        &self,
        owner: &UserId,
        request: RecipeRequest,
    ) -> Result<Recipe, Error> {
        let row = NewRecipeRow {
            id: RecipeId::random(),
            user_id: *owner,
            details: request.details.clone(),
            now: self.clock.utc(),
        };
        let mut tx = self.begin(TransactionAccess::ReadWrite).await?;
        let outcome = insert_aggregate(tx.as_mut(), &row, &request)
            .await
            .map_err(map_store_error);
        Self::finish(tx, outcome).await
    }

    async fn update_recipe(
        &self,
        owner: &UserId,
        id: &RecipeId,
        request: RecipeRequest,
    ) -> Result<Recipe, Error> {
        self.require_owned(owner, id).await?;
        let now = self.clock.utc();
        let mut tx = self.begin(TransactionAccess::ReadWrite).await?;
        let outcome = replace_aggregate(tx.as_mut(), id, &request, now).await;
        Self::finish(tx, outcome).await
    }

    async fn delete_recipe(&self, owner: &UserId, id: &RecipeId) -> Result<(), Error> {
        self.require_owned(owner, id).await?;
        let deleted = self
            .store
            .delete_recipe(owner, id)
            .await
            .map_err(map_store_error)?;
        if deleted {
            Ok(())
        } else {
            Err(recipe_not_found(id))
        }
    }
}

#[async_trait]
impl<S> RecipeReader for RecipeService<S>
where
    S: RecipeStore,
{
    async fn get_recipe(&self, id: &RecipeId) -> Result<Recipe, Error> {
        let mut tx = self.begin(TransactionAccess::ReadOnly).await?;
        let outcome = read_aggregate(tx.as_mut(), id).await;
        Self::finish(tx, outcome).await
    }

    async fn list_recipes(
        &self,
        owner: &UserId,
        page: PageRequest,
    ) -> Result<Vec<RecipeSummary>, Error> {
        self.store
            .list_recipes_by_owner(owner, page)
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
