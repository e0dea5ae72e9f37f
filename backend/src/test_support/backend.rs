//! Real domain services wired over the in-memory adapters.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::AccessTokenCodec;
use crate::domain::{AccountService, CatalogService, RecipeService, TokenService, UserId};
use crate::inbound::http::state::HttpState;

use super::{
    InMemoryCatalogRepository, InMemoryRecipeStore, InMemoryRefreshTokenRepository,
    InMemoryUserRepository, MutableClock, PlainTextHasher, StaticTokenCodec,
};

/// Default instant the backend's clock starts at.
pub fn backend_epoch() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).single() {
        Some(instant) => instant,
        None => panic!("backend epoch"),
    }
}

/// Every service the HTTP layer needs, backed by inspectable doubles.
pub struct InMemoryBackend {
    /// Shared clock; advance it to age tokens.
    pub clock: Arc<MutableClock>,
    /// Account storage.
    pub users: Arc<InMemoryUserRepository>,
    /// Refresh-token storage.
    pub refresh_tokens: Arc<InMemoryRefreshTokenRepository>,
    /// Recipe storage, including the catalog rows recipes link to.
    pub recipes: Arc<InMemoryRecipeStore>,
    /// Catalog storage served by the catalog endpoints, mirrored into
    /// `recipes` so created entries can be linked.
    pub catalogs: Arc<InMemoryCatalogRepository>,
    codec: Arc<StaticTokenCodec>,
    state: HttpState,
}

impl InMemoryBackend {
    /// Wire fresh doubles with the clock at [`backend_epoch`].
    pub fn new() -> Self {
        let clock = Arc::new(MutableClock::new(backend_epoch()));
        let users = Arc::new(InMemoryUserRepository::default());
        let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::default());
        let recipes = Arc::new(InMemoryRecipeStore::default());
        let catalogs = Arc::new(InMemoryCatalogRepository::linked_to(recipes.clone()));
        let codec = Arc::new(StaticTokenCodec::default());
        let dyn_clock: Arc<dyn Clock> = clock.clone();

        let tokens = Arc::new(TokenService::new(
            refresh_tokens.clone(),
            codec.clone(),
            dyn_clock.clone(),
        ));
        let accounts = Arc::new(AccountService::new(
            users.clone(),
            Arc::new(PlainTextHasher),
            tokens.clone(),
            dyn_clock.clone(),
        ));
        let recipe_service = Arc::new(RecipeService::new(recipes.clone(), dyn_clock.clone()));
        let catalog_service = Arc::new(CatalogService::new(catalogs.clone(), dyn_clock));

        let state = HttpState {
            tokens,
            accounts,
            recipes: recipe_service.clone(),
            recipe_writer: recipe_service,
            catalog: catalog_service.clone(),
            catalog_query: catalog_service,
        };

        Self {
            clock,
            users,
            refresh_tokens,
            recipes,
            catalogs,
            codec,
            state,
        }
    }

    /// Handler state sharing this backend's doubles.
    pub fn http_state(&self) -> HttpState {
        self.state.clone()
    }

    /// A live access token for `user` at the current clock time.
    pub fn access_token(&self, user: &UserId) -> String {
        match self.codec.issue(user, self.clock.utc()) {
            Ok(token) => token,
            Err(err) => panic!("static token codec: {err}"),
        }
    }

    /// `Authorization` header value carrying [`Self::access_token`].
    pub fn bearer(&self, user: &UserId) -> String {
        format!("Bearer {}", self.access_token(user))
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}
