//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// User accounts keyed by UUID; `email` is unique.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Opaque refresh tokens. Rows are soft-revoked, never deleted by the
    /// service; they cascade away with their user.
    refresh_tokens (value) {
        value -> Text,
        user_id -> Uuid,
        created_at -> Timestamptz,
        expired_at -> Timestamptz,
        revoked -> Bool,
    }
}

diesel::table! {
    /// Cuisine catalog. `parent_id` references another cuisine.
    cuisines (id) {
        id -> Uuid,
        name -> Text,
        parent_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ingredient catalog. `parent_id` references another ingredient.
    ingredients (id) {
        id -> Uuid,
        name -> Text,
        parent_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipe host rows; dependents cascade on delete.
    recipes (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Text,
        external_url -> Nullable<Text>,
        description -> Nullable<Text>,
        servings -> Int4,
        #[sql_name = "yield"]
        yield_amount -> Nullable<Text>,
        cook_time_in_minutes -> Int4,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Cuisine links, unique per `(recipe_id, cuisine_id)`.
    recipe_cuisines (recipe_id, cuisine_id) {
        recipe_id -> Uuid,
        cuisine_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ingredient links, unique per `(recipe_id, ingredient_id)`.
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Uuid,
        ingredient_id -> Uuid,
        amount -> Text,
        prep_note -> Nullable<Text>,
        index -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipe steps, unique per `(recipe_id, step_no)`.
    instructions (recipe_id, step_no) {
        recipe_id -> Uuid,
        step_no -> Int4,
        instruction -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(refresh_tokens -> users (user_id));
diesel::joinable!(recipes -> users (user_id));
diesel::joinable!(recipe_cuisines -> recipes (recipe_id));
diesel::joinable!(recipe_cuisines -> cuisines (cuisine_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(instructions -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    refresh_tokens,
    cuisines,
    ingredients,
    recipes,
    recipe_cuisines,
    recipe_ingredients,
    instructions,
);
