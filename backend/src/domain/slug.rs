//! Tag slug value type.
//!
//! Slugs are trimmed, non-empty identifiers of at most [`SLUG_MAX`] ASCII
//! letters, digits, hyphens, or underscores. They are what recipe filters
//! match on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum slug length.
pub const SLUG_MAX: usize = 32;

/// Validation errors for [`Slug`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugValidationError {
    #[error("slug must not be empty")]
    Empty,
    #[error("slug must be at most {max} characters")]
    TooLong { max: usize },
    #[error("slug may only contain ASCII letters, digits, hyphens, or underscores")]
    InvalidCharacters,
}

/// URL-safe tag identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate and construct a [`Slug`].
    pub fn new(value: impl Into<String>) -> Result<Self, SlugValidationError> {
        let value = value.into();
        if !is_trimmed_non_empty(&value) {
            return Err(SlugValidationError::Empty);
        }
        if value.len() > SLUG_MAX {
            return Err(SlugValidationError::TooLong { max: SLUG_MAX });
        }
        if !has_allowed_slug_chars(&value) {
            return Err(SlugValidationError::InvalidCharacters);
        }
        Ok(Self(value))
    }
}

fn is_trimmed_non_empty(value: &str) -> bool {
    !value.is_empty() && value.trim() == value
}

fn has_allowed_slug_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("breakfast")]
    #[case("Quick_Meals")]
    #[case("low-carb-2")]
    fn accepts_valid_slugs(#[case] raw: &str) {
        assert_eq!(Slug::new(raw).expect("valid slug").as_ref(), raw);
    }

    #[rstest]
    #[case("", SlugValidationError::Empty)]
    #[case(" lunch", SlugValidationError::Empty)]
    #[case("main course", SlugValidationError::InvalidCharacters)]
    #[case("завтрак", SlugValidationError::InvalidCharacters)]
    fn rejects_invalid_slugs(#[case] raw: &str, #[case] expected: SlugValidationError) {
        assert_eq!(Slug::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_oversized_slugs() {
        assert_eq!(
            Slug::new("a".repeat(SLUG_MAX + 1)),
            Err(SlugValidationError::TooLong { max: SLUG_MAX })
        );
    }
}
