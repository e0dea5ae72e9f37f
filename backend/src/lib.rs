//! Mealbook backend library: recipe aggregates, accounts, and tokens behind a
//! hexagonal core.
//!
//! - [`domain`]: types, services, reconcilers, and port traits.
//! - [`inbound`]: Actix HTTP handlers.
//! - [`outbound`]: Diesel persistence plus Argon2 and JWT adapters.
//! - [`middleware`]: request tracing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
