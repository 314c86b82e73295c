//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters.
//! Driving ports (`*Query`, `*Command`) are implemented by domain services
//! and consumed by inbound adapters; each ships a fixture implementation
//! used when no database is configured.

mod macros;
pub(crate) use macros::define_port_error;

mod catalogue_query;
mod catalogue_repository;
mod ingredient_import_repository;
mod recipe_relations_command;
mod recipe_repository;
mod recipes_command;
mod recipes_query;
mod relation_repository;
mod shopping_list_query;
mod shopping_list_repository;
mod subscriptions_command;
mod subscriptions_query;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::{CatalogueQuery, FixtureCatalogueQuery};
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
#[cfg(test)]
pub use ingredient_import_repository::MockIngredientImportRepository;
pub use ingredient_import_repository::{
    IngredientImportRepository, IngredientImportRepositoryError,
};
#[cfg(test)]
pub use recipe_relations_command::MockRecipeRelationsCommand;
pub use recipe_relations_command::{FixtureRecipeRelationsCommand, RecipeRelationsCommand};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{
    AuthorRecipes, RecipeFilter, RecipeRepository, RecipeRepositoryError, RelationFilter,
};
#[cfg(test)]
pub use recipes_command::MockRecipesCommand;
pub use recipes_command::{FixtureRecipesCommand, RecipesCommand};
#[cfg(test)]
pub use recipes_query::MockRecipesQuery;
pub use recipes_query::{FixtureRecipesQuery, RecipeListRequest, RecipesQuery};
#[cfg(test)]
pub use relation_repository::{MockRelationRepository, MockSubscriptionRelationRepository};
pub use relation_repository::{RelationRepository, RelationRepositoryError};
#[cfg(test)]
pub use shopping_list_query::MockShoppingListQuery;
pub use shopping_list_query::{FixtureShoppingListQuery, ShoppingListQuery};
#[cfg(test)]
pub use shopping_list_repository::MockShoppingListRepository;
pub use shopping_list_repository::{ShoppingListRepository, ShoppingListRepositoryError};
#[cfg(test)]
pub use subscriptions_command::MockSubscriptionsCommand;
pub use subscriptions_command::{FixtureSubscriptionsCommand, SubscriptionsCommand};
#[cfg(test)]
pub use subscriptions_query::MockSubscriptionsQuery;
pub use subscriptions_query::{FixtureSubscriptionsQuery, SubscriptionsQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{FixtureUsersQuery, UsersQuery};
