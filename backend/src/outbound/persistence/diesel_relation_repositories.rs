//! PostgreSQL-backed `RelationRepository` implementations.
//!
//! Favourites, shopping carts and subscriptions are all `(user_id, target)`
//! tables with a composite primary key, so one macro generates the three
//! adapters. The primary key settles concurrent adds; the losing insert
//! surfaces as `AlreadyExists`.

use std::collections::HashSet;

use crate::domain::ports::RelationRepositoryError;

use super::diesel_helpers::{DieselFailure, classify_diesel_error, map_basic_pool_error};
use super::pool::PoolError;

fn map_pool_error(error: PoolError) -> RelationRepositoryError {
    map_basic_pool_error(error, RelationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RelationRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => RelationRepositoryError::connection(message),
        DieselFailure::UniqueViolation { .. } => RelationRepositoryError::already_exists(),
        DieselFailure::ForeignKeyViolation { .. } => RelationRepositoryError::missing_target(),
        DieselFailure::NotFound => RelationRepositoryError::query("record not found"),
        DieselFailure::Query(message) => RelationRepositoryError::query(message),
    }
}

/// Generate a Diesel relation adapter over a `(user_id, <target>)` table.
///
/// The target id type must offer `from_uuid` and `as_uuid`.
macro_rules! relation_repository {
    (
        $(#[$meta:meta])*
        pub struct $repo:ident {
            table: $table:ident,
            target: $target_column:ident,
            target_type: $target_ty:ty $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $repo {
            pool: $crate::outbound::persistence::DbPool,
        }

        impl $repo {
            pub fn new(pool: $crate::outbound::persistence::DbPool) -> Self {
                Self { pool }
            }
        }

        #[async_trait::async_trait]
        impl $crate::domain::ports::RelationRepository for $repo {
            type Target = $target_ty;

            async fn insert(
                &self,
                user: &$crate::domain::UserId,
                target: &$target_ty,
            ) -> Result<(), RelationRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::outbound::persistence::schema::$table;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                diesel::insert_into($table::table)
                    .values((
                        $table::user_id.eq(*user.as_uuid()),
                        $table::$target_column.eq(*target.as_uuid()),
                    ))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(())
            }

            async fn remove(
                &self,
                user: &$crate::domain::UserId,
                target: &$target_ty,
            ) -> Result<bool, RelationRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::outbound::persistence::schema::$table;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let deleted = diesel::delete(
                    $table::table
                        .filter($table::user_id.eq(*user.as_uuid()))
                        .filter($table::$target_column.eq(*target.as_uuid())),
                )
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
                Ok(deleted > 0)
            }

            async fn targets_among(
                &self,
                user: &$crate::domain::UserId,
                candidates: &[$target_ty],
            ) -> Result<HashSet<$target_ty>, RelationRepositoryError> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::outbound::persistence::schema::$table;

                if candidates.is_empty() {
                    return Ok(HashSet::new());
                }
                let ids: Vec<uuid::Uuid> = candidates.iter().map(|id| *id.as_uuid()).collect();
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;

                let present: Vec<uuid::Uuid> = $table::table
                    .filter($table::user_id.eq(*user.as_uuid()))
                    .filter($table::$target_column.eq_any(ids))
                    .select($table::$target_column)
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(present.into_iter().map(<$target_ty>::from_uuid).collect())
            }
        }
    };
}

relation_repository! {
    /// Favourite recipes per user.
    pub struct DieselFavoriteRepository {
        table: favorites,
        target: recipe_id,
        target_type: crate::domain::RecipeId,
    }
}

relation_repository! {
    /// Shopping cart recipes per user.
    pub struct DieselShoppingCartRepository {
        table: shopping_cart,
        target: recipe_id,
        target_type: crate::domain::RecipeId,
    }
}

relation_repository! {
    /// Authors each user follows.
    pub struct DieselSubscriptionRepository {
        table: subscriptions,
        target: author_id,
        target_type: crate::domain::UserId,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("violation".to_owned()))
    }

    #[rstest]
    #[case(
        database_error(DatabaseErrorKind::UniqueViolation),
        RelationRepositoryError::already_exists()
    )]
    #[case(
        database_error(DatabaseErrorKind::ForeignKeyViolation),
        RelationRepositoryError::missing_target()
    )]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection),
        RelationRepositoryError::connection("database connection error")
    )]
    #[case(
        database_error(DatabaseErrorKind::SerializationFailure),
        RelationRepositoryError::query("database error")
    )]
    fn constraint_violations_map_to_relation_outcomes(
        #[case] error: DieselError,
        #[case] expected: RelationRepositoryError,
    ) {
        assert_eq!(map_diesel_error(error), expected);
    }

    #[rstest]
    fn pool_failures_are_connection_errors() {
        assert_eq!(
            map_pool_error(PoolError::checkout("timed out")),
            RelationRepositoryError::connection("timed out")
        );
    }
}
