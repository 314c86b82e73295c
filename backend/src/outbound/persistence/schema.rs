//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// User accounts. Rows are provisioned by the identity layer.
    users (id) {
        id -> Uuid,
        /// Unique, at most 254 characters.
        email -> Varchar,
        /// Unique, at most 150 characters.
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Reference to an uploaded avatar image.
        avatar -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ingredient catalogue. `(name, measurement_unit)` is unique.
    ingredients (id) {
        id -> Int8,
        name -> Varchar,
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    /// Recipe labels. `slug` is unique.
    tags (id) {
        id -> Int8,
        name -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    /// Recipes. `short_code` is unique and never updated.
    recipes (id) {
        id -> Uuid,
        author_id -> Uuid,
        name -> Varchar,
        image -> Varchar,
        text -> Text,
        /// Minutes, checked positive by the database.
        cooking_time -> Int4,
        short_code -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ingredient lines of a recipe.
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Uuid,
        ingredient_id -> Int8,
        /// Checked positive by the database.
        amount -> Int4,
    }
}

diesel::table! {
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Uuid,
        tag_id -> Int8,
    }
}

diesel::table! {
    /// Recipes a user marked as favourite.
    favorites (user_id, recipe_id) {
        user_id -> Uuid,
        recipe_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipes in a user's shopping cart.
    shopping_cart (user_id, recipe_id) {
        user_id -> Uuid,
        recipe_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Authors a user follows.
    subscriptions (user_id, author_id) {
        user_id -> Uuid,
        author_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(shopping_cart -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    ingredients,
    tags,
    recipes,
    recipe_ingredients,
    recipe_tags,
    favorites,
    shopping_cart,
    subscriptions,
);
