//! PostgreSQL-backed `CatalogRepository` implementation using Diesel ORM.
//!
//! The cuisine and ingredient tables share one shape, so the queries are
//! generated once per table and the adapter dispatches on [`CatalogKind`].
//! Deleting an entry that still has children or recipe links fails with a
//! foreign-key violation, reported as a constraint error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{CatalogRepository, CatalogRepositoryError};
use crate::domain::{CatalogDraft, CatalogEntry, CatalogEntryId, CatalogKind};

use super::diesel_error_mapping::{map_constrained_diesel_error, map_pool_error};
use super::models::CatalogRow;
use super::pool::{DbPool, PoolError};

/// Diesel-backed implementation of the `CatalogRepository` port.
#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CatalogRepositoryError {
    map_pool_error(error, CatalogRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> CatalogRepositoryError {
    map_constrained_diesel_error(
        error,
        CatalogRepositoryError::query,
        CatalogRepositoryError::connection,
        CatalogRepositoryError::constraint,
    )
}

fn row_to_entry(row: CatalogRow) -> CatalogEntry {
    CatalogEntry {
        id: CatalogEntryId::from_uuid(row.id),
        name: row.name,
        parent_id: row.parent_id.map(CatalogEntryId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

macro_rules! catalog_queries {
    ($module:ident, $table:ident) => {
        mod $module {
            use super::*;
            use crate::outbound::persistence::schema::$table;

            const COLUMNS: (
                $table::id,
                $table::name,
                $table::parent_id,
                $table::created_at,
                $table::updated_at,
            ) = (
                $table::id,
                $table::name,
                $table::parent_id,
                $table::created_at,
                $table::updated_at,
            );

            pub(super) async fn exists(
                conn: &mut AsyncPgConnection,
                id: &CatalogEntryId,
            ) -> QueryResult<bool> {
                diesel::select(diesel::dsl::exists($table::table.find(id.as_uuid())))
                    .get_result(conn)
                    .await
            }

            pub(super) async fn insert(
                conn: &mut AsyncPgConnection,
                id: &CatalogEntryId,
                draft: &CatalogDraft,
                now: DateTime<Utc>,
            ) -> QueryResult<CatalogRow> {
                diesel::insert_into($table::table)
                    .values((
                        $table::id.eq(id.as_uuid()),
                        $table::name.eq(draft.name()),
                        $table::parent_id.eq(draft.parent_id().map(|p| *p.as_uuid())),
                        $table::created_at.eq(now),
                        $table::updated_at.eq(now),
                    ))
                    .returning(COLUMNS)
                    .get_result(conn)
                    .await
            }

            pub(super) async fn update(
                conn: &mut AsyncPgConnection,
                id: &CatalogEntryId,
                draft: &CatalogDraft,
                now: DateTime<Utc>,
            ) -> QueryResult<Option<CatalogRow>> {
                diesel::update($table::table.find(id.as_uuid()))
                    .set((
                        $table::name.eq(draft.name()),
                        $table::parent_id.eq(draft.parent_id().map(|p| *p.as_uuid())),
                        $table::updated_at.eq(now),
                    ))
                    .returning(COLUMNS)
                    .get_result(conn)
                    .await
                    .optional()
            }

            pub(super) async fn list(conn: &mut AsyncPgConnection) -> QueryResult<Vec<CatalogRow>> {
                $table::table
                    .select(COLUMNS)
                    .order(($table::name.asc(), $table::id.asc()))
                    .load(conn)
                    .await
            }

            pub(super) async fn delete(
                conn: &mut AsyncPgConnection,
                id: &CatalogEntryId,
            ) -> QueryResult<usize> {
                diesel::delete($table::table.find(id.as_uuid()))
                    .execute(conn)
                    .await
            }
        }
    };
}

catalog_queries!(cuisine_queries, cuisines);
catalog_queries!(ingredient_queries, ingredients);

#[async_trait]
impl CatalogRepository for DieselCatalogRepository {
    async fn exists(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
    ) -> Result<bool, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let result = match kind {
            CatalogKind::Cuisine => cuisine_queries::exists(&mut conn, id).await,
            CatalogKind::Ingredient => ingredient_queries::exists(&mut conn, id).await,
        };
        result.map_err(diesel_error)
    }

    async fn insert(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
        draft: &CatalogDraft,
        now: DateTime<Utc>,
    ) -> Result<CatalogEntry, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let result = match kind {
            CatalogKind::Cuisine => cuisine_queries::insert(&mut conn, id, draft, now).await,
            CatalogKind::Ingredient => ingredient_queries::insert(&mut conn, id, draft, now).await,
        };
        result.map(row_to_entry).map_err(diesel_error)
    }

    async fn update(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
        draft: &CatalogDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<CatalogEntry>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let result = match kind {
            CatalogKind::Cuisine => cuisine_queries::update(&mut conn, id, draft, now).await,
            CatalogKind::Ingredient => ingredient_queries::update(&mut conn, id, draft, now).await,
        };
        result
            .map(|row| row.map(row_to_entry))
            .map_err(diesel_error)
    }

    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let result = match kind {
            CatalogKind::Cuisine => cuisine_queries::list(&mut conn).await,
            CatalogKind::Ingredient => ingredient_queries::list(&mut conn).await,
        };
        result
            .map(|rows| rows.into_iter().map(row_to_entry).collect())
            .map_err(diesel_error)
    }

    async fn delete(
        &self,
        kind: CatalogKind,
        id: &CatalogEntryId,
    ) -> Result<bool, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let result = match kind {
            CatalogKind::Cuisine => cuisine_queries::delete(&mut conn, id).await,
            CatalogKind::Ingredient => ingredient_queries::delete(&mut conn, id).await,
        };
        result.map(|deleted| deleted > 0).map_err(diesel_error)
    }
}
