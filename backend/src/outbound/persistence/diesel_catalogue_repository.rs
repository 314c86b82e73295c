//! PostgreSQL-backed `CatalogueRepository` over the ingredient and tag tables.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{Ingredient, IngredientId, Tag, TagId};

use super::diesel_helpers::{collect_rows, map_basic_diesel_error, map_basic_pool_error};
use super::models::{IngredientRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::row_conversions::{row_to_ingredient, row_to_tag};
use super::schema::{ingredients, tags};

/// Diesel-backed read adapter for ingredients and tags.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    map_basic_pool_error(error, CatalogueRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_basic_diesel_error(
        error,
        CatalogueRepositoryError::query,
        CatalogueRepositoryError::connection,
    )
}

/// `ILIKE` pattern matching names that start with `prefix`, with the
/// pattern metacharacters escaped.
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Requested ids absent from `found`, deduplicated, in request order.
fn absent<T: Copy + Eq + std::hash::Hash>(requested: &[T], found: &HashSet<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id) && seen.insert(*id))
        .collect()
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_ingredients(
        &self,
        name_prefix: &str,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = ingredients::table
            .select(IngredientRow::as_select())
            .order_by((ingredients::name.asc(), ingredients::measurement_unit.asc()))
            .into_boxed();
        if !name_prefix.is_empty() {
            query = query.filter(ingredients::name.ilike(prefix_pattern(name_prefix)));
        }

        let rows: Vec<IngredientRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_ingredient).collect())
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<IngredientRow> = ingredients::table
            .find(id.get())
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_ingredient))
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TagRow> = tags::table
            .select(TagRow::as_select())
            .order_by((tags::name.asc(), tags::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows.into_iter().map(row_to_tag), CatalogueRepositoryError::query)
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TagRow> = tags::table
            .find(id.get())
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_tag)
            .transpose()
            .map_err(CatalogueRepositoryError::query)
    }

    async fn missing_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let found: Vec<i64> = ingredients::table
            .filter(ingredients::id.eq_any(raw))
            .select(ingredients::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let found = found.into_iter().map(IngredientId::new).collect();
        Ok(absent(ids, &found))
    }

    async fn missing_tags(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let found: Vec<i64> = tags::table
            .filter(tags::id.eq_any(raw))
            .select(tags::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let found = found.into_iter().map(TagId::new).collect();
        Ok(absent(ids, &found))
    }
}
