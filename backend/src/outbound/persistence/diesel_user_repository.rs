//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageParams;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Page, User, UserId};

use super::diesel_helpers::{
    collect_rows, count_to_total, map_basic_diesel_error, map_basic_pool_error, page_window,
};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::row_conversions::row_to_user;
use super::schema::{subscriptions, users};

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn to_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserPersistenceError> {
    collect_rows(rows.into_iter().map(row_to_user), UserPersistenceError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user)
            .transpose()
            .map_err(UserPersistenceError::query)
    }

    async fn list(&self, page: &PageParams) -> Result<Page<User>, UserPersistenceError> {
        let (limit, offset) = page_window(page).map_err(UserPersistenceError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order_by((users::username.asc(), users::id.asc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Page::new(to_users(rows)?, count_to_total(total)))
    }

    async fn subscribed_authors(
        &self,
        subscriber: &UserId,
        page: &PageParams,
    ) -> Result<Page<User>, UserPersistenceError> {
        let (limit, offset) = page_window(page).map_err(UserPersistenceError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let authors = || {
            subscriptions::table
                .filter(subscriptions::user_id.eq(*subscriber.as_uuid()))
                .select(subscriptions::author_id)
        };

        let total: i64 = users::table
            .filter(users::id.eq_any(authors()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(authors()))
            .select(UserRow::as_select())
            .order_by((users::username.asc(), users::id.asc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Page::new(to_users(rows)?, count_to_total(total)))
    }
}
