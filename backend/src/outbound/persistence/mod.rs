//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types.
//!
//! # Example
//!
//! ```ignore
//! use mealbook::outbound::persistence::{DbPool, DieselRecipeStore, PoolConfig};
//!
//! let config = PoolConfig::new("postgres://localhost/mealbook");
//! let pool = DbPool::new(config).await?;
//! let store = DieselRecipeStore::new(pool);
//! ```

mod diesel_catalog_repository;
mod diesel_error_mapping;
mod diesel_recipe_store;
mod diesel_refresh_token_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalog_repository::DieselCatalogRepository;
pub use diesel_recipe_store::DieselRecipeStore;
pub use diesel_refresh_token_repository::DieselRefreshTokenRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
