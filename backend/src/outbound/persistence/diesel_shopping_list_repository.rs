//! PostgreSQL-backed `ShoppingListRepository`.
//!
//! Reads the ingredient lines of every recipe in a user's cart. Summing is
//! left to the domain so the grouping rules live in one place.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ShoppingListRepository, ShoppingListRepositoryError};
use crate::domain::{CartLine, UserId};

use super::diesel_helpers::{
    collect_rows, map_basic_diesel_error, map_basic_pool_error, positive_from_db,
};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, recipe_ingredients, shopping_cart};

/// Diesel-backed cart line reader.
#[derive(Clone)]
pub struct DieselShoppingListRepository {
    pool: DbPool,
}

impl DieselShoppingListRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ShoppingListRepositoryError {
    map_basic_pool_error(error, ShoppingListRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ShoppingListRepositoryError {
    map_basic_diesel_error(
        error,
        ShoppingListRepositoryError::query,
        ShoppingListRepositoryError::connection,
    )
}

fn row_to_line((name, measurement_unit, amount): (String, String, i32)) -> Result<CartLine, String> {
    Ok(CartLine {
        name,
        measurement_unit,
        amount: positive_from_db(amount, "amount")?,
    })
}

#[async_trait]
impl ShoppingListRepository for DieselShoppingListRepository {
    async fn cart_lines(&self, user: &UserId) -> Result<Vec<CartLine>, ShoppingListRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let cart = shopping_cart::table
            .filter(shopping_cart::user_id.eq(*user.as_uuid()))
            .select(shopping_cart::recipe_id);
        let rows: Vec<(String, String, i32)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(recipe_ingredients::recipe_id.eq_any(cart))
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                recipe_ingredients::amount,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        collect_rows(
            rows.into_iter().map(row_to_line),
            ShoppingListRepositoryError::query,
        )
    }
}
