//! Driving ports for catalog use-cases.

use async_trait::async_trait;

use crate::domain::{CatalogDraft, CatalogEntry, CatalogEntryId, CatalogKind, Error};

/// Mutations on the cuisine and ingredient catalogs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogCommand: Send + Sync {
    /// Create an entry; a named parent must exist.
    async fn create_entry(
        &self,
        kind: CatalogKind,
        draft: CatalogDraft,
    ) -> Result<CatalogEntry, Error>;

    /// Replace an entry's name and parent.
    async fn update_entry(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
        draft: CatalogDraft,
    ) -> Result<CatalogEntry, Error>;

    /// Delete an entry that nothing references.
    async fn delete_entry(&self, kind: CatalogKind, id: &CatalogEntryId) -> Result<(), Error>;
}

/// Read access to the catalogs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// All entries of `kind` ordered by name.
    async fn list_entries(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, Error>;
}
