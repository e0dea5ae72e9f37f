//! PostgreSQL-backed `RecipeStore` implementation using Diesel ORM.
//!
//! Each method issues exactly one SQL statement. Transactions are opened with
//! the connection's ANSI transaction manager on an owned pooled connection, so
//! a single transaction can span every call the recipe service makes.
//!
//! A recipe transaction dropped without `commit` or `rollback` (for
//! example when the request future is cancelled) returns its connection to the
//! pool mid-transaction. The pool discards such connections, which makes the
//! server roll the transaction back; nothing is ever committed implicitly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, RunQueryDsl, TransactionManager};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{
    NewRecipeRow, RecipeStore, RecipeStoreError, RecipeTransaction, TransactionAccess,
};
use crate::domain::{
    CatalogEntryId, CuisineLink, IngredientLine, IngredientLink, Instruction, PageRequest,
    RecipeDetails, RecipeId, RecipeSummary, UserId,
};

use super::diesel_error_mapping::{map_constrained_diesel_error, map_pool_error};
use super::models::{
    IngredientLinkRow, NewCuisineLinkRow, NewIngredientLinkRow, NewInstructionRow,
    NewRecipeRecord, RecipeRow, RecipeUpdate,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    cuisines, ingredients, instructions, recipe_cuisines, recipe_ingredients, recipes,
};

/// Diesel-backed implementation of the `RecipeStore` port.
#[derive(Clone)]
pub struct DieselRecipeStore {
    pool: DbPool,
}

impl DieselRecipeStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RecipeStoreError {
    map_pool_error(error, RecipeStoreError::connection)
}

fn diesel_error(error: diesel::result::Error) -> RecipeStoreError {
    map_constrained_diesel_error(
        error,
        RecipeStoreError::query,
        RecipeStoreError::connection,
        RecipeStoreError::constraint,
    )
}

fn row_to_summary(row: RecipeRow) -> RecipeSummary {
    RecipeSummary {
        id: RecipeId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        details: RecipeDetails {
            name: row.name,
            external_url: row.external_url,
            description: row.description,
            servings: row.servings,
            yield_amount: row.yield_amount,
            cook_time_in_minutes: row.cook_time_in_minutes,
            notes: row.notes,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn row_to_ingredient_link(row: IngredientLinkRow) -> IngredientLink {
    IngredientLink {
        id: CatalogEntryId::from_uuid(row.id),
        name: row.name,
        amount: row.amount,
        prep_note: row.prep_note,
        index: row.index,
    }
}

fn recipe_update(details: &RecipeDetails, now: DateTime<Utc>) -> RecipeUpdate<'_> {
    RecipeUpdate {
        name: &details.name,
        external_url: details.external_url.as_deref(),
        description: details.description.as_deref(),
        servings: details.servings,
        yield_amount: details.yield_amount.as_deref(),
        cook_time_in_minutes: details.cook_time_in_minutes,
        notes: details.notes.as_deref(),
        updated_at: now,
    }
}

#[async_trait]
impl RecipeStore for DieselRecipeStore {
    async fn begin(
        &self,
        access: TransactionAccess,
    ) -> Result<Box<dyn RecipeTransaction>, RecipeStoreError> {
        let mut conn = self.pool.get_owned().await.map_err(pool_error)?;
        AnsiTransactionManager::begin_transaction(&mut *conn)
            .await
            .map_err(diesel_error)?;
        let mut tx = DieselRecipeTransaction { conn };
        if access == TransactionAccess::ReadOnly {
            if let Err(error) = diesel::sql_query("SET TRANSACTION READ ONLY")
                .execute(tx.conn())
                .await
            {
                let mapped = diesel_error(error);
                if let Err(err) = AnsiTransactionManager::rollback_transaction(tx.conn()).await {
                    warn!(error = %err, "recipe transaction rollback failed");
                }
                return Err(mapped);
            }
        }
        debug!(?access, "recipe transaction opened");
        Ok(Box::new(tx))
    }

    async fn find_recipe(&self, id: &RecipeId) -> Result<Option<RecipeSummary>, RecipeStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        select_recipe(&mut conn, id).await
    }

    async fn list_recipes_by_owner(
        &self,
        owner: &UserId,
        page: PageRequest,
    ) -> Result<Vec<RecipeSummary>, RecipeStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<RecipeRow> = recipes::table
            .filter(recipes::user_id.eq(owner.as_uuid()))
            .order((recipes::name.asc(), recipes::id.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(row_to_summary).collect())
    }

    async fn delete_recipe(
        &self,
        owner: &UserId,
        id: &RecipeId,
    ) -> Result<bool, RecipeStoreError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(
            recipes::table
                .filter(recipes::id.eq(id.as_uuid()))
                .filter(recipes::user_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}

async fn select_recipe(
    conn: &mut AsyncPgConnection,
    id: &RecipeId,
) -> Result<Option<RecipeSummary>, RecipeStoreError> {
    let row: Option<RecipeRow> = recipes::table
        .find(id.as_uuid())
        .select(RecipeRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(diesel_error)?;
    Ok(row.map(row_to_summary))
}

/// Open transaction on an owned pooled connection.
struct DieselRecipeTransaction {
    conn: PooledConnection<'static, AsyncPgConnection>,
}

impl DieselRecipeTransaction {
    fn conn(&mut self) -> &mut AsyncPgConnection {
        &mut self.conn
    }
}

#[async_trait]
impl RecipeTransaction for DieselRecipeTransaction {
    async fn insert_recipe(
        &mut self,
        row: &NewRecipeRow,
    ) -> Result<RecipeSummary, RecipeStoreError> {
        let record = NewRecipeRecord {
            id: *row.id.as_uuid(),
            user_id: *row.user_id.as_uuid(),
            name: &row.details.name,
            external_url: row.details.external_url.as_deref(),
            description: row.details.description.as_deref(),
            servings: row.details.servings,
            yield_amount: row.details.yield_amount.as_deref(),
            cook_time_in_minutes: row.details.cook_time_in_minutes,
            notes: row.details.notes.as_deref(),
            created_at: row.now,
            updated_at: row.now,
        };
        let stored: RecipeRow = diesel::insert_into(recipes::table)
            .values(&record)
            .returning(RecipeRow::as_returning())
            .get_result(self.conn())
            .await
            .map_err(diesel_error)?;
        Ok(row_to_summary(stored))
    }

    async fn update_recipe(
        &mut self,
        id: &RecipeId,
        details: &RecipeDetails,
        now: DateTime<Utc>,
    ) -> Result<Option<RecipeSummary>, RecipeStoreError> {
        let stored: Option<RecipeRow> = diesel::update(recipes::table.find(id.as_uuid()))
            .set(&recipe_update(details, now))
            .returning(RecipeRow::as_returning())
            .get_result(self.conn())
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(stored.map(row_to_summary))
    }

    async fn find_recipe(
        &mut self,
        id: &RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipeStoreError> {
        select_recipe(self.conn(), id).await
    }

    async fn add_cuisine_link(
        &mut self,
        recipe_id: &RecipeId,
        cuisine_id: &CatalogEntryId,
        now: DateTime<Utc>,
    ) -> Result<(), RecipeStoreError> {
        let row = NewCuisineLinkRow {
            recipe_id: *recipe_id.as_uuid(),
            cuisine_id: *cuisine_id.as_uuid(),
            created_at: now,
            updated_at: now,
        };
        diesel::insert_into(recipe_cuisines::table)
            .values(&row)
            .execute(self.conn())
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn remove_cuisine_link(
        &mut self,
        recipe_id: &RecipeId,
        cuisine_id: &CatalogEntryId,
    ) -> Result<(), RecipeStoreError> {
        diesel::delete(recipe_cuisines::table.find((recipe_id.as_uuid(), cuisine_id.as_uuid())))
            .execute(self.conn())
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn list_cuisine_links(
        &mut self,
        recipe_id: &RecipeId,
    ) -> Result<Vec<CuisineLink>, RecipeStoreError> {
        let rows: Vec<(Uuid, String)> = recipe_cuisines::table
            .inner_join(cuisines::table)
            .filter(recipe_cuisines::recipe_id.eq(recipe_id.as_uuid()))
            .order((cuisines::name.asc(), cuisines::id.asc()))
            .select((cuisines::id, cuisines::name))
            .load(self.conn())
            .await
            .map_err(diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| CuisineLink {
                id: CatalogEntryId::from_uuid(id),
                name,
            })
            .collect())
    }

    async fn add_ingredient_links(
        &mut self,
        recipe_id: &RecipeId,
        lines: &[IngredientLine],
        now: DateTime<Utc>,
    ) -> Result<(), RecipeStoreError> {
        if lines.is_empty() {
            return Ok(());
        }
        let rows: Vec<NewIngredientLinkRow<'_>> = lines
            .iter()
            .map(|line| NewIngredientLinkRow {
                recipe_id: *recipe_id.as_uuid(),
                ingredient_id: *line.ingredient_id.as_uuid(),
                amount: &line.amount,
                prep_note: line.prep_note.as_deref(),
                index: line.index,
                created_at: now,
                updated_at: now,
            })
            .collect();
        diesel::insert_into(recipe_ingredients::table)
            .values(&rows)
            .execute(self.conn())
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn remove_ingredient_links(
        &mut self,
        recipe_id: &RecipeId,
    ) -> Result<(), RecipeStoreError> {
        diesel::delete(
            recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id.as_uuid())),
        )
        .execute(self.conn())
        .await
        .map(|_| ())
        .map_err(diesel_error)
    }

    async fn list_ingredient_links(
        &mut self,
        recipe_id: &RecipeId,
    ) -> Result<Vec<IngredientLink>, RecipeStoreError> {
        let rows: Vec<IngredientLinkRow> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(recipe_ingredients::recipe_id.eq(recipe_id.as_uuid()))
            .order((recipe_ingredients::index.asc(), ingredients::name.asc()))
            .select((
                ingredients::id,
                ingredients::name,
                recipe_ingredients::amount,
                recipe_ingredients::prep_note,
                recipe_ingredients::index,
            ))
            .load(self.conn())
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(row_to_ingredient_link).collect())
    }

    async fn add_instruction(
        &mut self,
        recipe_id: &RecipeId,
        instruction: &Instruction,
        now: DateTime<Utc>,
    ) -> Result<(), RecipeStoreError> {
        let row = NewInstructionRow {
            recipe_id: *recipe_id.as_uuid(),
            step_no: instruction.step_no,
            instruction: &instruction.instruction,
            created_at: now,
            updated_at: now,
        };
        diesel::insert_into(instructions::table)
            .values(&row)
            .execute(self.conn())
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn update_instruction(
        &mut self,
        recipe_id: &RecipeId,
        instruction: &Instruction,
        now: DateTime<Utc>,
    ) -> Result<(), RecipeStoreError> {
        diesel::update(instructions::table.find((recipe_id.as_uuid(), instruction.step_no)))
            .set((
                instructions::instruction.eq(&instruction.instruction),
                instructions::updated_at.eq(now),
            ))
            .execute(self.conn())
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn delete_instruction(
        &mut self,
        recipe_id: &RecipeId,
        step_no: i32,
    ) -> Result<(), RecipeStoreError> {
        diesel::delete(instructions::table.find((recipe_id.as_uuid(), step_no)))
            .execute(self.conn())
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn list_instructions(
        &mut self,
        recipe_id: &RecipeId,
    ) -> Result<Vec<Instruction>, RecipeStoreError> {
        let rows: Vec<(i32, String)> = instructions::table
            .filter(instructions::recipe_id.eq(recipe_id.as_uuid()))
            .order(instructions::step_no.asc())
            .select((instructions::step_no, instructions::instruction))
            .load(self.conn())
            .await
            .map_err(diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(step_no, instruction)| Instruction {
                step_no,
                instruction,
            })
            .collect())
    }

    async fn commit(self: Box<Self>) -> Result<(), RecipeStoreError> {
        let mut tx = self;
        AnsiTransactionManager::commit_transaction(tx.conn())
            .await
            .map_err(diesel_error)?;
        debug!("recipe transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RecipeStoreError> {
        let mut tx = self;
        AnsiTransactionManager::rollback_transaction(tx.conn())
            .await
            .map_err(diesel_error)?;
        debug!("recipe transaction rolled back");
        Ok(())
    }
}
