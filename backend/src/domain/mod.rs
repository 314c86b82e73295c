//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, and the services that implement the driving ports.
//! Keep types immutable and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable error identifier.
//! - TraceId: per-request correlation identifier.
//! - User, Recipe, Ingredient, Tag: core aggregates.
//! - relation: the add/remove toggle behind favourites, carts and
//!   subscriptions.
//! - ShoppingList: cart aggregation.
//! - ingredient_import: CSV seeding of the ingredient catalogue.
//! - ports: hexagonal boundary traits.

pub mod catalogue;
pub mod catalogue_service;
pub mod error;
pub mod ingredient_import;
pub mod page;
pub mod ports;
pub mod recipe;
pub mod recipe_relations_service;
pub mod recipes_service;
pub mod relation;
pub mod shopping_list;
pub mod shopping_list_service;
pub mod short_code;
pub mod slug;
pub mod subscription;
pub mod subscriptions_service;
pub mod trace_id;
pub mod user;
pub mod users_service;

pub use self::catalogue::{Ingredient, IngredientId, Tag, TagId};
pub use self::catalogue_service::CatalogueService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::ingredient_import::{
    INGREDIENT_NAME_MAX, ImportSummary, IngredientCsvError, IngredientImportService,
    MEASUREMENT_UNIT_MAX, NewIngredient, NewIngredientError, read_ingredient_csv,
};
pub use self::page::Page;
pub use self::recipe::{
    IngredientAmount, RECIPE_NAME_MAX, Recipe, RecipeDraft, RecipeDraftInput, RecipeId,
    RecipeIngredient, RecipeSummary, RecipeValidationError, RecipeView, SMALL_POSITIVE_MAX,
};
pub use self::recipe_relations_service::{RecipeRelationsService, RecipeSummaries};
pub use self::recipes_service::RecipesService;
pub use self::relation::{
    FAVORITE_MESSAGES, RelationAction, RelationMessages, RelationOutcome, SHOPPING_CART_MESSAGES,
    TargetRepresentation,
};
pub use self::shopping_list::{
    CART_EMPTY_MESSAGE, CartLine, SHOPPING_LIST_FILENAME, ShoppingList, ShoppingListEntry,
};
pub use self::shopping_list_service::ShoppingListService;
pub use self::short_code::{
    SHORT_CODE_ATTEMPTS, SHORT_CODE_LEN, ShortCode, ShortCodeValidationError,
};
pub use self::slug::{SLUG_MAX, Slug, SlugValidationError};
pub use self::subscription::{
    SELF_SUBSCRIPTION_MESSAGE, SUBSCRIPTION_MESSAGES, SubscriptionProfile,
};
pub use self::subscriptions_service::{SubscriptionProfiles, SubscriptionsService};
pub use self::trace_id::TraceId;
pub use self::user::{
    EMAIL_MAX, Email, USERNAME_MAX, User, UserId, UserProfile, UserValidationError, Username,
};
pub use self::users_service::UsersService;
