//! Ingredient and tag reference data.
//!
//! Both are curated lists loaded by operators; recipes reference them by id.

use serde::{Deserialize, Serialize};

use crate::domain::Slug;

/// Primary key of an [`Ingredient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(i64);

impl IngredientId {
    /// Wrap a raw database key.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw database key.
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Primary key of a [`Tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(i64);

impl TagId {
    /// Wrap a raw database key.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw database key.
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// An ingredient with its measurement unit. `(name, measurement_unit)` is
/// unique across the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// A recipe label such as "breakfast".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: Slug,
}
