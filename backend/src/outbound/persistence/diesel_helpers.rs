//! Shared helpers for the Diesel repositories.
//!
//! Every repository folds pool and Diesel failures into its own port error.
//! [`classify_diesel_error`] does the logging and sorts the failure into the
//! handful of cases the ports distinguish; each repository then maps those
//! cases onto its variants.

use pagination::PageParams;
use tracing::debug;

use super::pool::PoolError;

/// Diesel failures as the ports see them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(&'static str),
    /// A `first`/`get_result` found no row.
    NotFound,
    /// A unique or primary key constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
    /// Anything else.
    Query(&'static str),
}

/// Log a Diesel error at `debug` and classify it.
pub(crate) fn classify_diesel_error(error: diesel::result::Error) -> DieselFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => DieselFailure::NotFound,
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(kind, info) => {
            let constraint = info.constraint_name().map(str::to_owned);
            match kind {
                DatabaseErrorKind::UniqueViolation => DieselFailure::UniqueViolation { constraint },
                DatabaseErrorKind::ForeignKeyViolation => {
                    DieselFailure::ForeignKeyViolation { constraint }
                }
                DatabaseErrorKind::ClosedConnection => {
                    DieselFailure::Connection("database connection error")
                }
                _ => DieselFailure::Query("database error"),
            }
        }
        _ => DieselFailure::Query("database error"),
    }
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => connection(message),
    }
}

/// Map a Diesel error for repositories that only report connection and query
/// failures. A missing row counts as a query failure.
pub(crate) fn map_basic_diesel_error<E>(
    error: diesel::result::Error,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => connection(message),
        DieselFailure::NotFound => query("record not found"),
        DieselFailure::UniqueViolation { .. } => query("unique constraint violated"),
        DieselFailure::ForeignKeyViolation { .. } => query("foreign key constraint violated"),
        DieselFailure::Query(message) => query(message),
    }
}

/// Convert a stored `INT4` amount or duration to its domain value.
pub(crate) fn positive_from_db(value: i32, column: &str) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("{column} is negative: {value}"))
}

/// Convert a validated domain amount or duration to `INT4`.
pub(crate) fn positive_for_db(value: u32, column: &str) -> Result<i32, String> {
    i32::try_from(value).map_err(|_| format!("{column} exceeds INT4: {value}"))
}

/// `LIMIT`/`OFFSET` pair for a page request.
pub(crate) fn page_window(page: &PageParams) -> Result<(i64, i64), String> {
    let offset = i64::try_from(page.offset()).map_err(|_| "page offset out of range".to_owned())?;
    Ok((i64::from(page.limit()), offset))
}

/// Convert a `COUNT(*)` result. Counts are never negative.
pub(crate) fn count_to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub(crate) fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("constraint failed".to_owned()))
    }

    #[rstest]
    #[case(DieselError::NotFound, DieselFailure::NotFound)]
    #[case(
        database_error(DatabaseErrorKind::UniqueViolation),
        DieselFailure::UniqueViolation { constraint: None }
    )]
    #[case(
        database_error(DatabaseErrorKind::ForeignKeyViolation),
        DieselFailure::ForeignKeyViolation { constraint: None }
    )]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection),
        DieselFailure::Connection("database connection error")
    )]
    #[case(
        database_error(DatabaseErrorKind::CheckViolation),
        DieselFailure::Query("database error")
    )]
    #[case(DieselError::RollbackTransaction, DieselFailure::Query("database error"))]
    fn classifies_diesel_errors(#[case] error: DieselError, #[case] expected: DieselFailure) {
        assert_eq!(classify_diesel_error(error), expected);
    }

    #[rstest]
    #[case(database_error(DatabaseErrorKind::ClosedConnection), "connection")]
    #[case(DieselError::NotFound, "query")]
    #[case(database_error(DatabaseErrorKind::UniqueViolation), "query")]
    fn basic_mapping_only_distinguishes_connection_loss(
        #[case] error: DieselError,
        #[case] expected: &str,
    ) {
        let mapped = map_basic_diesel_error(error, |_| "query", |_| "connection");
        assert_eq!(mapped, expected);
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let mapped = map_basic_pool_error(PoolError::checkout("timed out"), |message| message);
        assert_eq!(mapped, "timed out");
    }

    #[rstest]
    #[case(1, Ok(1))]
    #[case(32_767, Ok(32_767))]
    #[case(-1, Err("amount is negative: -1".to_owned()))]
    fn stored_amounts_must_be_non_negative(
        #[case] value: i32,
        #[case] expected: Result<u32, String>,
    ) {
        assert_eq!(positive_from_db(value, "amount"), expected);
    }

    #[rstest]
    #[case(None, None, (6, 0))]
    #[case(Some(3), Some(10), (10, 20))]
    fn page_window_matches_page_params(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected: (i64, i64),
    ) {
        let params = PageParams::new(page, limit).expect("valid page params");
        assert_eq!(page_window(&params), Ok(expected));
    }

    #[rstest]
    #[case(-1, 0)]
    #[case(42, 42)]
    fn counts_convert_to_totals(#[case] count: i64, #[case] expected: u64) {
        assert_eq!(count_to_total(count), expected);
    }

    #[rstest]
    fn oversized_domain_values_are_rejected() {
        assert!(positive_for_db(u32::MAX, "amount").is_err());
        assert_eq!(positive_for_db(25, "cooking_time"), Ok(25));
    }
}
