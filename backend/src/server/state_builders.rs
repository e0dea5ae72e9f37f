//! Builders wiring Diesel adapters and security adapters into HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use zeroize::Zeroizing;

use mealbook::domain::ports::{AccessTokenCodec, CredentialHasher, TokenLifecycle};
use mealbook::domain::{AccountService, CatalogService, RecipeService, TokenService};
use mealbook::inbound::http::state::HttpState;
use mealbook::outbound::persistence::{
    DbPool, DieselCatalogRepository, DieselRecipeStore, DieselRefreshTokenRepository,
    DieselUserRepository,
};
use mealbook::outbound::security::{Argon2Hasher, JwtAccessTokenCodec};

use super::config::{ServerSettings, SettingsError};

/// Build the access token codec from the signing settings.
fn build_codec(settings: &ServerSettings) -> Result<Arc<dyn AccessTokenCodec>, SettingsError> {
    let secret = Zeroizing::new(settings.jwt_secret()?.as_bytes().to_vec());
    let codec = JwtAccessTokenCodec::new(&secret, settings.jwt_issuer())
        .with_ttl(settings.access_token_ttl()?);
    Ok(Arc::new(codec))
}

/// Build handler state backed by PostgreSQL.
///
/// # Errors
///
/// Returns [`SettingsError`] when token settings are missing or invalid.
pub fn build_http_state(
    pool: &DbPool,
    settings: &ServerSettings,
) -> Result<HttpState, SettingsError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher::new());

    let tokens: Arc<dyn TokenLifecycle> = Arc::new(
        TokenService::new(
            Arc::new(DieselRefreshTokenRepository::new(pool.clone())),
            build_codec(settings)?,
            clock.clone(),
        )
        .with_refresh_ttl(settings.refresh_token_ttl()?),
    );
    let accounts = Arc::new(AccountService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        hasher,
        tokens.clone(),
        clock.clone(),
    ));
    let recipes = Arc::new(RecipeService::new(
        Arc::new(DieselRecipeStore::new(pool.clone())),
        clock.clone(),
    ));
    let catalog = Arc::new(CatalogService::new(
        Arc::new(DieselCatalogRepository::new(pool.clone())),
        clock,
    ));

    Ok(HttpState {
        tokens,
        accounts,
        recipes: recipes.clone(),
        recipe_writer: recipes,
        catalog: catalog.clone(),
        catalog_query: catalog,
    })
}
