//! Recipe aggregate and its validated write model.
//!
//! A [`RecipeDraft`] is what clients submit on create and update; it is
//! checked here before any repository call so the store only ever sees
//! well-formed recipes. [`Recipe`] is the fully resolved read model.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Ingredient, IngredientId, ShortCode, Tag, TagId, User};

/// Maximum recipe name length, in characters.
pub const RECIPE_NAME_MAX: usize = 256;
/// Upper bound shared by cooking times and ingredient amounts.
pub const SMALL_POSITIVE_MAX: u32 = 32_767;

/// Stable recipe identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(Uuid);

impl RecipeId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecipeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Reasons a [`RecipeDraft`] is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    #[error("recipe name must not be empty")]
    EmptyName,
    #[error("recipe name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("recipe image must not be empty")]
    EmptyImage,
    #[error("recipe text must not be empty")]
    EmptyText,
    #[error("cooking time must be between 1 and {max} minutes")]
    CookingTimeOutOfRange { max: u32 },
    #[error("recipe must contain at least one ingredient")]
    NoIngredients,
    #[error("ingredient {id} is listed more than once")]
    DuplicateIngredient { id: i64 },
    #[error("amount for ingredient {id} must be between 1 and {max}")]
    AmountOutOfRange { id: i64, max: u32 },
    #[error("recipe must have at least one tag")]
    NoTags,
    #[error("tag {id} is listed more than once")]
    DuplicateTag { id: i64 },
}

impl RecipeValidationError {
    /// Request field the error refers to.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyImage => "image",
            Self::EmptyText => "text",
            Self::CookingTimeOutOfRange { .. } => "cooking_time",
            Self::NoIngredients
            | Self::DuplicateIngredient { .. }
            | Self::AmountOutOfRange { .. } => "ingredients",
            Self::NoTags | Self::DuplicateTag { .. } => "tags",
        }
    }
}

/// One ingredient line of a submitted recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: IngredientId,
    pub amount: u32,
}

/// Unvalidated recipe fields as received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraftInput {
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: u32,
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<TagId>,
}

/// Validated recipe write model.
///
/// # Examples
/// ```
/// use foodgram_backend::domain::{
///     IngredientAmount, IngredientId, RecipeDraft, RecipeDraftInput, TagId,
/// };
///
/// let draft = RecipeDraft::new(RecipeDraftInput {
///     name: "Pancakes".into(),
///     image: "recipes/pancakes.png".into(),
///     text: "Mix and fry.".into(),
///     cooking_time: 20,
///     ingredients: vec![IngredientAmount {
///         ingredient_id: IngredientId::new(1),
///         amount: 200,
///     }],
///     tags: vec![TagId::new(1)],
/// })
/// .expect("valid draft");
/// assert_eq!(draft.name(), "Pancakes");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    name: String,
    image: String,
    text: String,
    cooking_time: u32,
    ingredients: Vec<IngredientAmount>,
    tags: Vec<TagId>,
}

impl RecipeDraft {
    /// Validate client input.
    pub fn new(input: RecipeDraftInput) -> Result<Self, RecipeValidationError> {
        let RecipeDraftInput {
            name,
            image,
            text,
            cooking_time,
            ingredients,
            tags,
        } = input;

        if name.trim().is_empty() {
            return Err(RecipeValidationError::EmptyName);
        }
        if name.chars().count() > RECIPE_NAME_MAX {
            return Err(RecipeValidationError::NameTooLong {
                max: RECIPE_NAME_MAX,
            });
        }
        if image.trim().is_empty() {
            return Err(RecipeValidationError::EmptyImage);
        }
        if text.trim().is_empty() {
            return Err(RecipeValidationError::EmptyText);
        }
        if !is_small_positive(cooking_time) {
            return Err(RecipeValidationError::CookingTimeOutOfRange {
                max: SMALL_POSITIVE_MAX,
            });
        }
        validate_ingredients(&ingredients)?;
        validate_tags(&tags)?;

        Ok(Self {
            name,
            image,
            text,
            cooking_time,
            ingredients,
            tags,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn cooking_time(&self) -> u32 {
        self.cooking_time
    }

    /// Ingredient lines in submission order.
    pub fn ingredients(&self) -> &[IngredientAmount] {
        &self.ingredients
    }

    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    /// Ingredient ids referenced by the draft.
    pub fn ingredient_ids(&self) -> Vec<IngredientId> {
        self.ingredients
            .iter()
            .map(|line| line.ingredient_id)
            .collect()
    }
}

const fn is_small_positive(value: u32) -> bool {
    value >= 1 && value <= SMALL_POSITIVE_MAX
}

fn validate_ingredients(lines: &[IngredientAmount]) -> Result<(), RecipeValidationError> {
    if lines.is_empty() {
        return Err(RecipeValidationError::NoIngredients);
    }
    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        let id = line.ingredient_id.get();
        if !seen.insert(line.ingredient_id) {
            return Err(RecipeValidationError::DuplicateIngredient { id });
        }
        if !is_small_positive(line.amount) {
            return Err(RecipeValidationError::AmountOutOfRange {
                id,
                max: SMALL_POSITIVE_MAX,
            });
        }
    }
    Ok(())
}

fn validate_tags(tags: &[TagId]) -> Result<(), RecipeValidationError> {
    if tags.is_empty() {
        return Err(RecipeValidationError::NoTags);
    }
    let mut seen = HashSet::with_capacity(tags.len());
    for tag in tags {
        if !seen.insert(*tag) {
            return Err(RecipeValidationError::DuplicateTag { id: tag.get() });
        }
    }
    Ok(())
}

/// Ingredient resolved against the catalogue, with its amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    pub amount: u32,
}

/// Persisted recipe with resolved author, ingredients and tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub author: User,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: u32,
    pub short_code: ShortCode,
    pub created_at: DateTime<Utc>,
    pub ingredients: Vec<RecipeIngredient>,
    pub tags: Vec<Tag>,
}

impl Recipe {
    /// Short representation returned by relation toggles and subscriptions.
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            cooking_time: self.cooking_time,
        }
    }
}

/// Short recipe representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub cooking_time: u32,
}

/// A recipe as seen by a (possibly anonymous) viewer.
///
/// All viewer flags are false for anonymous viewers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub author_is_subscribed: bool,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeView {
    /// View with every viewer flag cleared.
    pub fn anonymous(recipe: Recipe) -> Self {
        Self {
            recipe,
            author_is_subscribed: false,
            is_favorited: false,
            is_in_shopping_cart: false,
        }
    }
}
