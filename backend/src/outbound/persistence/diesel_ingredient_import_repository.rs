//! PostgreSQL-backed `IngredientImportRepository`.
//!
//! Rows are inserted in batches with `ON CONFLICT (name, measurement_unit)
//! DO NOTHING`, so the affected-row count is the number of new pairs.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::NewIngredient;
use crate::domain::ports::{IngredientImportRepository, IngredientImportRepositoryError};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewIngredientRow;
use super::pool::{DbPool, PoolError};
use super::schema::ingredients;

/// Rows per `INSERT`. Two bind parameters per row keep a batch well under
/// PostgreSQL's 65535 parameter limit.
const INSERT_BATCH: usize = 1000;

/// Diesel-backed writer for the ingredient catalogue.
#[derive(Clone)]
pub struct DieselIngredientImportRepository {
    pool: DbPool,
}

impl DieselIngredientImportRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IngredientImportRepositoryError {
    map_basic_pool_error(error, IngredientImportRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> IngredientImportRepositoryError {
    map_basic_diesel_error(
        error,
        IngredientImportRepositoryError::query,
        IngredientImportRepositoryError::connection,
    )
}

#[async_trait]
impl IngredientImportRepository for DieselIngredientImportRepository {
    async fn insert_missing(
        &self,
        ingredients: &[NewIngredient],
    ) -> Result<usize, IngredientImportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut inserted = 0;
        for batch in ingredients.chunks(INSERT_BATCH) {
            let rows: Vec<NewIngredientRow<'_>> = batch
                .iter()
                .map(|ingredient| NewIngredientRow {
                    name: ingredient.name(),
                    measurement_unit: ingredient.measurement_unit(),
                })
                .collect();
            inserted += diesel::insert_into(ingredients::table)
                .values(&rows)
                .on_conflict((ingredients::name, ingredients::measurement_unit))
                .do_nothing()
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        }
        Ok(inserted)
    }
}
