//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    instructions, recipe_cuisines, recipe_ingredients, recipes, refresh_tokens, users,
};

// ---------------------------------------------------------------------------
// User models
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Refresh token models
// ---------------------------------------------------------------------------

/// Refresh token row; also used for inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = refresh_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RefreshTokenRow {
    pub value: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
    pub revoked: bool,
}

// ---------------------------------------------------------------------------
// Catalog models
// ---------------------------------------------------------------------------

/// Catalog row selected positionally from either catalog table.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct CatalogRow {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Recipe models
// ---------------------------------------------------------------------------

/// Row struct for reading from the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub external_url: Option<String>,
    pub description: Option<String>,
    pub servings: i32,
    pub yield_amount: Option<String>,
    pub cook_time_in_minutes: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new recipe host rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRecord<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub external_url: Option<&'a str>,
    pub description: Option<&'a str>,
    pub servings: i32,
    pub yield_amount: Option<&'a str>,
    pub cook_time_in_minutes: i32,
    pub notes: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement of the mutable host fields; `None` clears a column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RecipeUpdate<'a> {
    pub name: &'a str,
    pub external_url: Option<&'a str>,
    pub description: Option<&'a str>,
    pub servings: i32,
    pub yield_amount: Option<&'a str>,
    pub cook_time_in_minutes: i32,
    pub notes: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable cuisine link.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_cuisines)]
pub(crate) struct NewCuisineLinkRow {
    pub recipe_id: Uuid,
    pub cuisine_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable ingredient link.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub(crate) struct NewIngredientLinkRow<'a> {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub amount: &'a str,
    pub prep_note: Option<&'a str>,
    pub index: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ingredient link joined with the catalog name.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct IngredientLinkRow {
    pub id: Uuid,
    pub name: String,
    pub amount: String,
    pub prep_note: Option<String>,
    pub index: i32,
}

/// Insertable instruction.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = instructions)]
pub(crate) struct NewInstructionRow<'a> {
    pub recipe_id: Uuid,
    pub step_no: i32,
    pub instruction: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
