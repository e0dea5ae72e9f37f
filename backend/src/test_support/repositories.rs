//! In-memory repositories for accounts, refresh tokens, and catalogs.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CatalogRepository, CatalogRepositoryError, RefreshTokenRepository,
    RefreshTokenRepositoryError, UserCredentialsRecord, UserRepository, UserRepositoryError,
};
use crate::domain::{
    CatalogDraft, CatalogEntry, CatalogEntryId, CatalogKind, EmailAddress, RefreshToken, UserId,
};

use super::InMemoryRecipeStore;

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("{name} mutex"),
    }
}

/// Refresh tokens keyed by value.
#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenRepository(Mutex<HashMap<String, RefreshToken>>);

impl InMemoryRefreshTokenRepository {
    /// Stored copy of a token, if any.
    pub fn get(&self, value: &str) -> Option<RefreshToken> {
        lock(&self.0, "refresh tokens").get(value).cloned()
    }

    /// Number of stored tokens.
    pub fn len(&self) -> usize {
        lock(&self.0, "refresh tokens").len()
    }

    /// Whether no token has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn save(&self, token: &RefreshToken) -> Result<(), RefreshTokenRepositoryError> {
        lock(&self.0, "refresh tokens").insert(token.value.clone(), token.clone());
        Ok(())
    }

    async fn find_by_value(
        &self,
        value: &str,
    ) -> Result<Option<RefreshToken>, RefreshTokenRepositoryError> {
        Ok(self.get(value))
    }

    async fn mark_revoked(&self, value: &str) -> Result<(), RefreshTokenRepositoryError> {
        if let Some(token) = lock(&self.0, "refresh tokens").get_mut(value) {
            token.revoked = true;
        }
        Ok(())
    }
}

/// User accounts keyed by id; emails are unique.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository(Mutex<HashMap<UserId, UserCredentialsRecord>>);

impl InMemoryUserRepository {
    /// Stored record for `id`, if any.
    pub fn get(&self, id: &UserId) -> Option<UserCredentialsRecord> {
        lock(&self.0, "users").get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, record: &UserCredentialsRecord) -> Result<(), UserRepositoryError> {
        let mut users = lock(&self.0, "users");
        if users
            .values()
            .any(|existing| existing.user.email == record.user.email)
        {
            return Err(UserRepositoryError::duplicate_email());
        }
        users.insert(record.user.id, record.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentialsRecord>, UserRepositoryError> {
        Ok(lock(&self.0, "users")
            .values()
            .find(|record| record.user.email == *email)
            .cloned())
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, UserRepositoryError> {
        let mut users = lock(&self.0, "users");
        let Some(record) = users.get_mut(id) else {
            return Ok(false);
        };
        password_hash.clone_into(&mut record.password_hash);
        record.user.updated_at = now;
        Ok(true)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        Ok(lock(&self.0, "users").remove(id).is_some())
    }
}

#[derive(Debug, Default)]
struct CatalogTables {
    entries: HashMap<(CatalogKind, CatalogEntryId), CatalogEntry>,
    referenced: HashSet<CatalogEntryId>,
}

/// Both catalogs with parent and usage restrictions on delete.
///
/// When linked to an [`InMemoryRecipeStore`], writes are mirrored into the
/// store's catalog tables and deletes are refused while a recipe links the
/// entry, as the SQL foreign keys do.
#[derive(Debug, Default)]
pub struct InMemoryCatalogRepository {
    tables: Mutex<CatalogTables>,
    recipes: Option<Arc<InMemoryRecipeStore>>,
}

impl InMemoryCatalogRepository {
    /// A catalog sharing its entries with `recipes`.
    pub fn linked_to(recipes: Arc<InMemoryRecipeStore>) -> Self {
        Self {
            tables: Mutex::default(),
            recipes: Some(recipes),
        }
    }

    /// Pretend a recipe links `id`, so deleting it violates a constraint.
    pub fn mark_referenced(&self, id: CatalogEntryId) {
        lock(&self.tables, "catalog").referenced.insert(id);
    }

    fn is_referenced(
        &self,
        tables: &CatalogTables,
        kind: CatalogKind,
        id: &CatalogEntryId,
    ) -> bool {
        tables.referenced.contains(id)
            || self
                .recipes
                .as_ref()
                .is_some_and(|recipes| recipes.is_linked(kind, id))
    }

    fn mirror(&self, kind: CatalogKind, entry: &CatalogEntry) {
        if let Some(recipes) = &self.recipes {
            recipes.put_catalog_entry(kind, entry.id, &entry.name);
        }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn exists(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
    ) -> Result<bool, CatalogRepositoryError> {
        Ok(lock(&self.tables, "catalog").entries.contains_key(&(kind, *id)))
    }

    async fn insert(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
        draft: &CatalogDraft,
        now: DateTime<Utc>,
    ) -> Result<CatalogEntry, CatalogRepositoryError> {
        let mut tables = lock(&self.tables, "catalog");
        if let Some(parent) = draft.parent_id() {
            if !tables.entries.contains_key(&(kind, parent)) {
                return Err(CatalogRepositoryError::constraint(format!(
                    "{kind} parent {parent} is not present"
                )));
            }
        }
        let entry = CatalogEntry {
            id: *id,
            name: draft.name().to_owned(),
            parent_id: draft.parent_id(),
            created_at: now,
            updated_at: now,
        };
        tables.entries.insert((kind, *id), entry.clone());
        self.mirror(kind, &entry);
        Ok(entry)
    }

    async fn update(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
        draft: &CatalogDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<CatalogEntry>, CatalogRepositoryError> {
        let mut tables = lock(&self.tables, "catalog");
        let Some(entry) = tables.entries.get_mut(&(kind, *id)) else {
            return Ok(None);
        };
        draft.name().clone_into(&mut entry.name);
        entry.parent_id = draft.parent_id();
        entry.updated_at = now;
        let entry = entry.clone();
        self.mirror(kind, &entry);
        Ok(Some(entry))
    }

    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, CatalogRepositoryError> {
        let tables = lock(&self.tables, "catalog");
        let mut entries: Vec<CatalogEntry> = tables
            .entries
            .iter()
            .filter(|((entry_kind, _), _)| *entry_kind == kind)
            .map(|(_, entry)| entry.clone())
            .collect();
        entries.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(entries)
    }

    async fn delete(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
    ) -> Result<bool, CatalogRepositoryError> {
        let mut tables = lock(&self.tables, "catalog");
        if !tables.entries.contains_key(&(kind, *id)) {
            return Ok(false);
        }
        let has_children = tables
            .entries
            .iter()
            .any(|((entry_kind, _), entry)| *entry_kind == kind && entry.parent_id == Some(*id));
        if has_children || self.is_referenced(&tables, kind, id) {
            return Err(CatalogRepositoryError::constraint(format!(
                "{kind} {id} is still referenced"
            )));
        }
        tables.entries.remove(&(kind, *id));
        if let Some(recipes) = &self.recipes {
            recipes.remove_catalog_entry(kind, id);
        }
        Ok(true)
    }
}
