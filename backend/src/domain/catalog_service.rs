//! Cuisine and ingredient catalog service.
//!
//! One service handles both catalogs; [`CatalogKind`] selects the table.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{
    CatalogCommand, CatalogQuery, CatalogRepository, CatalogRepositoryError,
};
use crate::domain::{
    CatalogDraft, CatalogEntry, CatalogEntryId, CatalogKind, CatalogValidationError, Error,
};

/// Catalog service implementing [`CatalogCommand`] and [`CatalogQuery`].
#[derive(Clone)]
pub struct CatalogService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> CatalogService<R> {
    /// Create a new service with the given repository.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

fn map_repository_error(error: CatalogRepositoryError) -> Error {
    match error {
        CatalogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalog repository unavailable: {message}"))
        }
        CatalogRepositoryError::Query { message } => {
            Error::internal(format!("catalog repository error: {message}"))
        }
        CatalogRepositoryError::Constraint { .. } => Error::constraint_violation(),
    }
}

fn parent_not_found(kind: CatalogKind) -> Error {
    Error::invalid_request(format!("parent {kind} does not exist")).with_details(json!({
        "field": "parent_id",
        "code": "parent_not_found",
    }))
}

fn entry_not_found(kind: CatalogKind, id: &CatalogEntryId) -> Error {
    Error::not_found(format!("{kind} {id} not found"))
}

impl<R> CatalogService<R>
where
    R: CatalogRepository,
{
    async fn ensure_parent(
        &self,
        kind: CatalogKind,
        draft: &CatalogDraft,
    ) -> Result<(), Error> {
        let Some(parent) = draft.parent_id() else {
            return Ok(());
        };
        let exists = self
            .repo
            .exists(kind, &parent)
            .await
            .map_err(map_repository_error)?;
        if exists {
            Ok(())
        } else {
            Err(parent_not_found(kind))
        }
    }
}

#[async_trait]
impl<R> CatalogCommand for CatalogService<R>
where
    R: CatalogRepository,
{
    async fn create_entry(
        &self,
        kind: CatalogKind,
        draft: CatalogDraft,
    ) -> Result<CatalogEntry, Error> {
        self.ensure_parent(kind, &draft).await?;
        self.repo
            .insert(kind, &CatalogEntryId::random(), &draft, self.clock.utc())
            .await
            .map_err(map_repository_error)
    }

    async fn update_entry(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
        draft: CatalogDraft,
    ) -> Result<CatalogEntry, Error> {
        if draft.parent_id() == Some(*id) {
            return Err(Error::invalid_request(CatalogValidationError::SelfParent.to_string())
                .with_details(json!({
                    "field": "parent_id",
                    "code": "self_parent",
                })));
        }
        self.ensure_parent(kind, &draft).await?;
        self.repo
            .update(kind, id, &draft, self.clock.utc())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| entry_not_found(kind, id))
    }

    async fn delete_entry(&self, kind: CatalogKind, id: &CatalogEntryId) -> Result<(), Error> {
        let deleted = self
            .repo
            .delete(kind, id)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(entry_not_found(kind, id))
        }
    }
}

#[async_trait]
impl<R> CatalogQuery for CatalogService<R>
where
    R: CatalogRepository,
{
    async fn list_entries(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, Error> {
        self.repo.list(kind).await.map_err(map_repository_error)
    }
}
