//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod catalog;
pub mod error;
pub mod health;
pub mod recipes;
pub mod state;
pub mod tokens;
pub mod users;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint on a scope or app.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use mealbook::inbound::http::api_routes;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(api_routes));
/// ```
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::change_password)
        .service(users::delete_account)
        .service(tokens::login)
        .service(tokens::refresh)
        .service(tokens::revoke)
        .service(recipes::create_recipe)
        .service(recipes::list_recipes)
        .service(recipes::get_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(catalog::list_cuisines)
        .service(catalog::create_cuisine)
        .service(catalog::update_cuisine)
        .service(catalog::delete_cuisine)
        .service(catalog::list_ingredients)
        .service(catalog::create_ingredient)
        .service(catalog::update_ingredient)
        .service(catalog::delete_ingredient);
}

#[cfg(test)]
pub(crate) mod test_utils;
