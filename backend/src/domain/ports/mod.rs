//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, `RecipeStore`, `CredentialHasher`,
//! `AccessTokenCodec`) are implemented by outbound adapters. Driving ports
//! (`RecipeReader`, `RecipeWriter`, `TokenLifecycle`, `AccountCommand`,
//! `CatalogCommand`, `CatalogQuery`) are implemented by domain services and
//! consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod access_token_codec;
mod account_command;
mod catalog_command;
mod catalog_repository;
mod credential_hasher;
mod recipe_reader;
mod recipe_store;
mod recipe_writer;
mod refresh_token_repository;
mod token_lifecycle;
mod user_repository;

#[cfg(test)]
pub use access_token_codec::MockAccessTokenCodec;
pub use access_token_codec::{AccessTokenCodec, AccessTokenError};
pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use catalog_command::{CatalogCommand, CatalogQuery};
#[cfg(test)]
pub use catalog_command::{MockCatalogCommand, MockCatalogQuery};
#[cfg(test)]
pub use catalog_repository::MockCatalogRepository;
pub use catalog_repository::{CatalogRepository, CatalogRepositoryError};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHasher};
#[cfg(test)]
pub use recipe_reader::MockRecipeReader;
pub use recipe_reader::RecipeReader;
#[cfg(test)]
pub use recipe_store::MockRecipeStore;
pub use recipe_store::{
    NewRecipeRow, RecipeStore, RecipeStoreError, RecipeTransaction, TransactionAccess,
};
#[cfg(test)]
pub use recipe_writer::MockRecipeWriter;
pub use recipe_writer::RecipeWriter;
#[cfg(test)]
pub use refresh_token_repository::MockRefreshTokenRepository;
pub use refresh_token_repository::{RefreshTokenRepository, RefreshTokenRepositoryError};
#[cfg(test)]
pub use token_lifecycle::MockTokenLifecycle;
pub use token_lifecycle::TokenLifecycle;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserCredentialsRecord, UserRepository, UserRepositoryError};
