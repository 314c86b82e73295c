//! Conversions from Diesel rows into domain values.
//!
//! Stored data is trusted to satisfy the database constraints, but the domain
//! constructors re-validate it. A row that fails validation is reported as a
//! query error rather than silently repaired.

use crate::domain::{Email, Ingredient, IngredientId, Slug, Tag, TagId, User, UserId, Username};

use super::models::{IngredientRow, TagRow, UserRow};

pub(crate) fn row_to_user(row: UserRow) -> Result<User, String> {
    let UserRow {
        id,
        email,
        username,
        first_name,
        last_name,
        avatar,
    } = row;
    Ok(User {
        id: UserId::from_uuid(id),
        email: Email::new(email).map_err(|err| err.to_string())?,
        username: Username::new(username).map_err(|err| err.to_string())?,
        first_name,
        last_name,
        avatar,
    })
}

pub(crate) fn row_to_ingredient(row: IngredientRow) -> Ingredient {
    Ingredient {
        id: IngredientId::new(row.id),
        name: row.name,
        measurement_unit: row.measurement_unit,
    }
}

pub(crate) fn row_to_tag(row: TagRow) -> Result<Tag, String> {
    Ok(Tag {
        id: TagId::new(row.id),
        name: row.name,
        slug: Slug::new(row.slug).map_err(|err| err.to_string())?,
    })
}
