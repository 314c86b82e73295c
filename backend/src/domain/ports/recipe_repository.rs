//! Port for recipe persistence.
//!
//! Writes touch the recipe row, its ingredient rows and its tag rows; adapters
//! must apply them atomically.

use async_trait::async_trait;
use pagination::PageParams;

use crate::domain::{
    Page, Recipe, RecipeDraft, RecipeId, RecipeSummary, ShortCode, Slug, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repositories.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
        /// Another recipe already owns the short code.
        ShortCodeTaken => "short code already in use",
        /// An ingredient or tag referenced by the draft does not exist.
        UnknownReference { message: String } => "recipe references missing rows: {message}",
        /// The recipe vanished during the write.
        NotFound => "recipe not found",
    }
}

/// Restricts recipes to those the given user has (or has not) related.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationFilter {
    pub user: UserId,
    pub present: bool,
}

/// Resolved list filter. Empty `tags` means any tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Recipes carrying at least one of these slugs.
    pub tags: Vec<Slug>,
    pub author: Option<UserId>,
    pub favorited: Option<RelationFilter>,
    pub in_shopping_cart: Option<RelationFilter>,
}

/// A preview of an author's recipes with their full count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorRecipes {
    /// Newest first.
    pub recipes: Vec<RecipeSummary>,
    pub total: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Store a new recipe authored by `author` and return it resolved.
    async fn insert(
        &self,
        id: RecipeId,
        author: &UserId,
        short_code: &ShortCode,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// Replace the recipe fields, ingredient rows and tag rows.
    async fn update(&self, id: &RecipeId, draft: &RecipeDraft)
    -> Result<Recipe, RecipeRepositoryError>;

    /// Delete the recipe and every row referencing it. Returns whether it
    /// existed.
    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipeRepositoryError>;

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError>;

    async fn find_by_short_code(
        &self,
        code: &ShortCode,
    ) -> Result<Option<RecipeId>, RecipeRepositoryError>;

    /// Matching recipes, newest first.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: &PageParams,
    ) -> Result<Page<Recipe>, RecipeRepositoryError>;

    /// Up to `limit` of the author's recipes (all when `None`), newest first.
    async fn author_recipes(
        &self,
        author: &UserId,
        limit: Option<usize>,
    ) -> Result<AuthorRecipes, RecipeRepositoryError>;
}
