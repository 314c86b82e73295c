//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven ports, backed by PostgreSQL through
//! `diesel-async` and a `bb8` connection pool.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and domain
//!   types. Validation and business rules stay in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: pool and Diesel failures are folded into each port's
//!   error enum.
//!
//! # Example
//!
//! ```no_run
//! use foodgram_backend::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/foodgram")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_catalogue_repository;
pub(crate) mod diesel_helpers;
mod diesel_ingredient_import_repository;
mod diesel_recipe_repository;
mod diesel_relation_repositories;
mod diesel_shopping_list_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod row_conversions;
mod schema;

pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_ingredient_import_repository::DieselIngredientImportRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_relation_repositories::{
    DieselFavoriteRepository, DieselShoppingCartRepository, DieselSubscriptionRepository,
};
pub use diesel_shopping_list_repository::DieselShoppingListRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DEFAULT_POOL_SIZE, DbPool, PoolConfig, PoolError};
