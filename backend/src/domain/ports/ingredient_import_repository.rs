//! Write-side port for seeding the ingredient catalogue.

use async_trait::async_trait;

use crate::domain::NewIngredient;

use super::define_port_error;

define_port_error! {
    /// Errors raised when writing imported ingredients.
    pub enum IngredientImportRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "ingredient import connection failed: {message}",
        /// Insert failed during execution.
        Query { message: String } =>
            "ingredient import query failed: {message}",
    }
}

/// Port for adding ingredients to the catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientImportRepository: Send + Sync {
    /// Insert every ingredient whose `(name, measurement_unit)` pair is not
    /// catalogued yet and return how many rows were written. Existing pairs
    /// are left untouched.
    async fn insert_missing(
        &self,
        ingredients: &[NewIngredient],
    ) -> Result<usize, IngredientImportRepositoryError>;
}
