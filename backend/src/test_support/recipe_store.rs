//! In-memory recipe store with snapshot transactions.
//!
//! `begin` copies the committed tables; statements run against the copy and
//! `commit` writes it back wholesale. Dropping or rolling back a transaction
//! discards the copy. Concurrent writers are last-commit-wins, which is enough
//! for single-threaded scenario tests.
//!
//! Foreign keys and uniqueness mirror the SQL schema: links must reference a
//! stored recipe and a known catalog entry, link pairs and step numbers are
//! unique per recipe, and deleting a recipe cascades.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    NewRecipeRow, RecipeStore, RecipeStoreError, RecipeTransaction, TransactionAccess,
};
use crate::domain::{
    CatalogEntryId, CatalogKind, CuisineLink, IngredientLine, IngredientLink, Instruction, PageRequest,
    RecipeDetails, RecipeId, RecipeSummary, UserId,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    cuisines: HashMap<CatalogEntryId, String>,
    ingredients: HashMap<CatalogEntryId, String>,
    recipes: Vec<RecipeSummary>,
    cuisine_links: Vec<(RecipeId, CatalogEntryId)>,
    ingredient_links: Vec<(RecipeId, IngredientLine)>,
    instructions: Vec<(RecipeId, Instruction)>,
}

impl Tables {
    fn find(&self, id: &RecipeId) -> Option<RecipeSummary> {
        self.recipes.iter().find(|recipe| recipe.id == *id).cloned()
    }

    fn require_recipe(&self, id: &RecipeId) -> Result<(), RecipeStoreError> {
        if self.recipes.iter().any(|recipe| recipe.id == *id) {
            Ok(())
        } else {
            Err(RecipeStoreError::constraint(format!(
                "recipe {id} is not present"
            )))
        }
    }

    fn cuisine_links(&self, id: &RecipeId) -> Vec<CuisineLink> {
        let mut links: Vec<CuisineLink> = self
            .cuisine_links
            .iter()
            .filter(|(recipe_id, _)| recipe_id == id)
            .map(|(_, cuisine_id)| CuisineLink {
                id: *cuisine_id,
                name: self.cuisines.get(cuisine_id).cloned().unwrap_or_default(),
            })
            .collect();
        links.sort_by(|left, right| left.name.cmp(&right.name).then(left.id.cmp(&right.id)));
        links
    }

    fn ingredient_links(&self, id: &RecipeId) -> Vec<IngredientLink> {
        let mut links: Vec<IngredientLink> = self
            .ingredient_links
            .iter()
            .filter(|(recipe_id, _)| recipe_id == id)
            .map(|(_, line)| IngredientLink {
                id: line.ingredient_id,
                name: self
                    .ingredients
                    .get(&line.ingredient_id)
                    .cloned()
                    .unwrap_or_default(),
                amount: line.amount.clone(),
                prep_note: line.prep_note.clone(),
                index: line.index,
            })
            .collect();
        links.sort_by_key(|link| link.index);
        links
    }

    fn instructions(&self, id: &RecipeId) -> Vec<Instruction> {
        let mut steps: Vec<Instruction> = self
            .instructions
            .iter()
            .filter(|(recipe_id, _)| recipe_id == id)
            .map(|(_, step)| step.clone())
            .collect();
        steps.sort_by_key(|step| step.step_no);
        steps
    }

    fn delete_cascade(&mut self, id: &RecipeId) {
        self.recipes.retain(|recipe| recipe.id != *id);
        self.cuisine_links.retain(|(recipe_id, _)| recipe_id != id);
        self.ingredient_links.retain(|(recipe_id, _)| recipe_id != id);
        self.instructions.retain(|(recipe_id, _)| recipe_id != id);
    }
}

/// Row counts stored for one recipe, used by atomicity assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoredRowCounts {
    /// Host rows (0 or 1).
    pub recipes: usize,
    /// Cuisine link rows.
    pub cuisine_links: usize,
    /// Ingredient link rows.
    pub ingredient_links: usize,
    /// Instruction rows.
    pub instructions: usize,
}

/// Thread-safe in-memory [`RecipeStore`].
#[derive(Debug, Default)]
pub struct InMemoryRecipeStore {
    tables: Arc<Mutex<Tables>>,
    commits: Arc<AtomicUsize>,
    rollbacks: Arc<AtomicUsize>,
}

impl InMemoryRecipeStore {
    fn lock_tables(&self) -> MutexGuard<'_, Tables> {
        lock(&self.tables)
    }

    /// Register a cuisine recipes may link and return its id.
    ///
    /// Entries seeded here are not listed by the catalog endpoints; create
    /// them through a linked [`super::InMemoryCatalogRepository`] for that.
    pub fn add_cuisine(&self, name: &str) -> CatalogEntryId {
        let id = CatalogEntryId::random();
        self.put_catalog_entry(CatalogKind::Cuisine, id, name);
        id
    }

    /// Register an ingredient recipes may link and return its id.
    pub fn add_ingredient(&self, name: &str) -> CatalogEntryId {
        let id = CatalogEntryId::random();
        self.put_catalog_entry(CatalogKind::Ingredient, id, name);
        id
    }

    /// Insert or rename a catalog entry recipes may link.
    pub fn put_catalog_entry(&self, kind: CatalogKind, id: CatalogEntryId, name: &str) {
        let mut tables = self.lock_tables();
        let names = match kind {
            CatalogKind::Cuisine => &mut tables.cuisines,
            CatalogKind::Ingredient => &mut tables.ingredients,
        };
        names.insert(id, name.to_owned());
    }

    /// Forget a catalog entry so new links to it fail.
    pub fn remove_catalog_entry(&self, kind: CatalogKind, id: &CatalogEntryId) {
        let mut tables = self.lock_tables();
        match kind {
            CatalogKind::Cuisine => tables.cuisines.remove(id),
            CatalogKind::Ingredient => tables.ingredients.remove(id),
        };
    }

    /// Whether any committed recipe links the entry.
    pub fn is_linked(&self, kind: CatalogKind, id: &CatalogEntryId) -> bool {
        let tables = self.lock_tables();
        match kind {
            CatalogKind::Cuisine => tables
                .cuisine_links
                .iter()
                .any(|(_, cuisine_id)| cuisine_id == id),
            CatalogKind::Ingredient => tables
                .ingredient_links
                .iter()
                .any(|(_, line)| line.ingredient_id == *id),
        }
    }

    /// Total committed host rows.
    pub fn recipe_count(&self) -> usize {
        self.lock_tables().recipes.len()
    }

    /// Committed rows across all tables that belong to any recipe.
    pub fn total_row_counts(&self) -> StoredRowCounts {
        let tables = self.lock_tables();
        StoredRowCounts {
            recipes: tables.recipes.len(),
            cuisine_links: tables.cuisine_links.len(),
            ingredient_links: tables.ingredient_links.len(),
            instructions: tables.instructions.len(),
        }
    }

    /// Committed rows belonging to `id`.
    pub fn row_counts(&self, id: &RecipeId) -> StoredRowCounts {
        let tables = self.lock_tables();
        StoredRowCounts {
            recipes: tables.recipes.iter().filter(|r| r.id == *id).count(),
            cuisine_links: tables.cuisine_links.iter().filter(|(r, _)| r == id).count(),
            ingredient_links: tables
                .ingredient_links
                .iter()
                .filter(|(r, _)| r == id)
                .count(),
            instructions: tables.instructions.iter().filter(|(r, _)| r == id).count(),
        }
    }

    /// Committed instructions of `id` ordered by step number.
    pub fn stored_instructions(&self, id: &RecipeId) -> Vec<Instruction> {
        self.lock_tables().instructions(id)
    }

    /// Number of committed transactions.
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Number of explicitly rolled-back transactions.
    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

fn lock(tables: &Mutex<Tables>) -> MutexGuard<'_, Tables> {
    match tables.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("recipe tables mutex"),
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn begin(
        &self,
        access: TransactionAccess,
    ) -> Result<Box<dyn RecipeTransaction>, RecipeStoreError> {
        let working = self.lock_tables().clone();
        Ok(Box::new(InMemoryTransaction {
            shared: Arc::clone(&self.tables),
            working,
            access,
            commits: Arc::clone(&self.commits),
            rollbacks: Arc::clone(&self.rollbacks),
        }))
    }

    async fn find_recipe(&self, id: &RecipeId) -> Result<Option<RecipeSummary>, RecipeStoreError> {
        Ok(self.lock_tables().find(id))
    }

    async fn list_recipes_by_owner(
        &self,
        owner: &UserId,
        page: PageRequest,
    ) -> Result<Vec<RecipeSummary>, RecipeStoreError> {
        let tables = self.lock_tables();
        let mut owned: Vec<RecipeSummary> = tables
            .recipes
            .iter()
            .filter(|recipe| recipe.is_owned_by(owner))
            .cloned()
            .collect();
        owned.sort_by(|left, right| left.details.name.cmp(&right.details.name));
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(owned.into_iter().skip(offset).take(limit).collect())
    }

    async fn delete_recipe(
        &self,
        owner: &UserId,
        id: &RecipeId,
    ) -> Result<bool, RecipeStoreError> {
        let mut tables = self.lock_tables();
        let owned = tables
            .recipes
            .iter()
            .any(|recipe| recipe.id == *id && recipe.is_owned_by(owner));
        if owned {
            tables.delete_cascade(id);
        }
        Ok(owned)
    }
}

struct InMemoryTransaction {
    shared: Arc<Mutex<Tables>>,
    working: Tables,
    access: TransactionAccess,
    commits: Arc<AtomicUsize>,
    rollbacks: Arc<AtomicUsize>,
}

impl InMemoryTransaction {
    fn writable(&mut self) -> Result<&mut Tables, RecipeStoreError> {
        match self.access {
            TransactionAccess::ReadWrite => Ok(&mut self.working),
            TransactionAccess::ReadOnly => Err(RecipeStoreError::query(
                "cannot execute a write in a read-only transaction",
            )),
        }
    }
}

#[async_trait]
impl RecipeTransaction for InMemoryTransaction {
    async fn insert_recipe(
        &mut self,
        row: &NewRecipeRow,
    ) -> Result<RecipeSummary, RecipeStoreError> {
        let tables = self.writable()?;
        if tables.find(&row.id).is_some() {
            return Err(RecipeStoreError::constraint(format!(
                "recipe {} already exists",
                row.id
            )));
        }
        let summary = RecipeSummary {
            id: row.id,
            user_id: row.user_id,
            details: row.details.clone(),
            created_at: row.now,
            updated_at: row.now,
        };
        tables.recipes.push(summary.clone());
        Ok(summary)
    }

    async fn update_recipe(
        &mut self,
        id: &RecipeId,
        details: &RecipeDetails,
        now: DateTime<Utc>,
    ) -> Result<Option<RecipeSummary>, RecipeStoreError> {
        let tables = self.writable()?;
        let Some(recipe) = tables.recipes.iter_mut().find(|recipe| recipe.id == *id) else {
            return Ok(None);
        };
        recipe.details = details.clone();
        recipe.updated_at = now;
        Ok(Some(recipe.clone()))
    }

    async fn find_recipe(
        &mut self,
        id: &RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipeStoreError> {
        Ok(self.working.find(id))
    }

    async fn add_cuisine_link(
        &mut self,
        recipe_id: &RecipeId,
        cuisine_id: &CatalogEntryId,
        _now: DateTime<Utc>,
    ) -> Result<(), RecipeStoreError> {
        let tables = self.writable()?;
        tables.require_recipe(recipe_id)?;
        if !tables.cuisines.contains_key(cuisine_id) {
            return Err(RecipeStoreError::constraint(format!(
                "cuisine {cuisine_id} is not present"
            )));
        }
        if tables
            .cuisine_links
            .iter()
            .any(|(r, c)| r == recipe_id && c == cuisine_id)
        {
            return Err(RecipeStoreError::constraint(format!(
                "cuisine {cuisine_id} already linked"
            )));
        }
        tables.cuisine_links.push((*recipe_id, *cuisine_id));
        Ok(())
    }

    async fn remove_cuisine_link(
        &mut self,
        recipe_id: &RecipeId,
        cuisine_id: &CatalogEntryId,
    ) -> Result<(), RecipeStoreError> {
        let tables = self.writable()?;
        tables
            .cuisine_links
            .retain(|(r, c)| !(r == recipe_id && c == cuisine_id));
        Ok(())
    }

    async fn list_cuisine_links(
        &mut self,
        recipe_id: &RecipeId,
    ) -> Result<Vec<CuisineLink>, RecipeStoreError> {
        Ok(self.working.cuisine_links(recipe_id))
    }

    async fn add_ingredient_links(
        &mut self,
        recipe_id: &RecipeId,
        lines: &[IngredientLine],
        _now: DateTime<Utc>,
    ) -> Result<(), RecipeStoreError> {
        if lines.is_empty() {
            return Ok(());
        }
        let tables = self.writable()?;
        tables.require_recipe(recipe_id)?;
        let mut staged = tables.ingredient_links.clone();
        for line in lines {
            if !tables.ingredients.contains_key(&line.ingredient_id) {
                return Err(RecipeStoreError::constraint(format!(
                    "ingredient {} is not present",
                    line.ingredient_id
                )));
            }
            if staged
                .iter()
                .any(|(r, existing)| r == recipe_id && existing.ingredient_id == line.ingredient_id)
            {
                return Err(RecipeStoreError::constraint(format!(
                    "ingredient {} already linked",
                    line.ingredient_id
                )));
            }
            staged.push((*recipe_id, line.clone()));
        }
        tables.ingredient_links = staged;
        Ok(())
    }

    async fn remove_ingredient_links(
        &mut self,
        recipe_id: &RecipeId,
    ) -> Result<(), RecipeStoreError> {
        let tables = self.writable()?;
        tables.ingredient_links.retain(|(r, _)| r != recipe_id);
        Ok(())
    }

    async fn list_ingredient_links(
        &mut self,
        recipe_id: &RecipeId,
    ) -> Result<Vec<IngredientLink>, RecipeStoreError> {
        Ok(self.working.ingredient_links(recipe_id))
    }

    async fn add_instruction(
        &mut self,
        recipe_id: &RecipeId,
        instruction: &Instruction,
        _now: DateTime<Utc>,
    ) -> Result<(), RecipeStoreError> {
        let tables = self.writable()?;
        tables.require_recipe(recipe_id)?;
        if tables
            .instructions
            .iter()
            .any(|(r, step)| r == recipe_id && step.step_no == instruction.step_no)
        {
            return Err(RecipeStoreError::constraint(format!(
                "step {} already exists",
                instruction.step_no
            )));
        }
        tables.instructions.push((*recipe_id, instruction.clone()));
        Ok(())
    }

    async fn update_instruction(
        &mut self,
        recipe_id: &RecipeId,
        instruction: &Instruction,
        _now: DateTime<Utc>,
    ) -> Result<(), RecipeStoreError> {
        let tables = self.writable()?;
        if let Some((_, step)) = tables
            .instructions
            .iter_mut()
            .find(|(r, step)| r == recipe_id && step.step_no == instruction.step_no)
        {
            step.instruction = instruction.instruction.clone();
        }
        Ok(())
    }

    async fn delete_instruction(
        &mut self,
        recipe_id: &RecipeId,
        step_no: i32,
    ) -> Result<(), RecipeStoreError> {
        let tables = self.writable()?;
        tables
            .instructions
            .retain(|(r, step)| !(r == recipe_id && step.step_no == step_no));
        Ok(())
    }

    async fn list_instructions(
        &mut self,
        recipe_id: &RecipeId,
    ) -> Result<Vec<Instruction>, RecipeStoreError> {
        Ok(self.working.instructions(recipe_id))
    }

    async fn commit(self: Box<Self>) -> Result<(), RecipeStoreError> {
        let this = *self;
        if this.access == TransactionAccess::ReadWrite {
            *lock(&this.shared) = this.working;
        }
        this.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RecipeStoreError> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
