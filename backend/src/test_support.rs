//! Test utilities for the backend crate.
//!
//! In-memory adapters for every driven port, shared by unit tests (in `src/`)
//! and integration tests (in `tests/`). Only compiled for tests or with the
//! `test-support` feature.

mod backend;
mod clock;
mod recipe_store;
mod repositories;
mod security;

pub use backend::{InMemoryBackend, backend_epoch};
pub use clock::MutableClock;
pub use recipe_store::{InMemoryRecipeStore, StoredRowCounts};
pub use repositories::{
    InMemoryCatalogRepository, InMemoryRefreshTokenRepository, InMemoryUserRepository,
};
pub use security::{PlainTextHasher, StaticTokenCodec};
