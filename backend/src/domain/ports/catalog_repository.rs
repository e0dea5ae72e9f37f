//! Port abstraction for cuisine and ingredient catalog persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CatalogDraft, CatalogEntry, CatalogEntryId, CatalogKind};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by catalog repository adapters.
    pub enum CatalogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalog repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalog repository query failed: {message}",
        /// A referential or uniqueness constraint rejected the write.
        Constraint { message: String } => "catalog repository constraint violated: {message}",
    }
}

/// Storage for catalog entries of either kind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Whether an entry with `id` exists in the `kind` catalog.
    async fn exists(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
    ) -> Result<bool, CatalogRepositoryError>;

    /// Insert a new entry and return it as stored.
    async fn insert(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
        draft: &CatalogDraft,
        now: DateTime<Utc>,
    ) -> Result<CatalogEntry, CatalogRepositoryError>;

    /// Replace name and parent; `None` when the entry does not exist.
    async fn update(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
        draft: &CatalogDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<CatalogEntry>, CatalogRepositoryError>;

    /// All entries ordered by name.
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, CatalogRepositoryError>;

    /// Delete an entry. Returns whether a row was removed.
    async fn delete(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
    ) -> Result<bool, CatalogRepositoryError>;
}
