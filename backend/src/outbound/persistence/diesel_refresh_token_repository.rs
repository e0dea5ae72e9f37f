//! PostgreSQL-backed `RefreshTokenRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RefreshTokenRepository, RefreshTokenRepositoryError};
use crate::domain::{RefreshToken, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_pool_error};
use super::models::RefreshTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::refresh_tokens;

/// Diesel-backed implementation of the `RefreshTokenRepository` port.
#[derive(Clone)]
pub struct DieselRefreshTokenRepository {
    pool: DbPool,
}

impl DieselRefreshTokenRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> RefreshTokenRepositoryError {
    map_pool_error(error, RefreshTokenRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> RefreshTokenRepositoryError {
    map_basic_diesel_error(
        error,
        RefreshTokenRepositoryError::query,
        RefreshTokenRepositoryError::connection,
    )
}

fn token_to_row(token: &RefreshToken) -> RefreshTokenRow {
    RefreshTokenRow {
        value: token.value.clone(),
        user_id: *token.user_id.as_uuid(),
        created_at: token.created_at,
        expired_at: token.expired_at,
        revoked: token.revoked,
    }
}

fn row_to_token(row: RefreshTokenRow) -> RefreshToken {
    RefreshToken {
        value: row.value,
        user_id: UserId::from_uuid(row.user_id),
        created_at: row.created_at,
        expired_at: row.expired_at,
        revoked: row.revoked,
    }
}

#[async_trait]
impl RefreshTokenRepository for DieselRefreshTokenRepository {
    async fn save(&self, token: &RefreshToken) -> Result<(), RefreshTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(refresh_tokens::table)
            .values(&token_to_row(token))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_value(
        &self,
        value: &str,
    ) -> Result<Option<RefreshToken>, RefreshTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<RefreshTokenRow> = refresh_tokens::table
            .find(value)
            .select(RefreshTokenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(row_to_token))
    }

    async fn mark_revoked(&self, value: &str) -> Result<(), RefreshTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::update(refresh_tokens::table.find(value))
            .set(refresh_tokens::revoked.eq(true))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }
}
