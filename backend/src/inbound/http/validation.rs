//! Shared validation helpers for inbound HTTP adapters.

use pagination::PaginationError;
use serde_json::json;

use crate::domain::{Error, RecipeId, RecipeValidationError, Slug, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidId,
    InvalidSlug,
    InvalidNumber,
    InvalidPagination,
    InvalidRecipe,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidSlug => "invalid_slug",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::InvalidPagination => "invalid_pagination",
            ErrorCode::InvalidRecipe => "invalid_recipe",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn parse_recipe_id(value: &str, field: FieldName) -> Result<RecipeId, Error> {
    value
        .parse()
        .map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Parse a positive catalogue id such as an ingredient or tag id.
pub(crate) fn parse_catalogue_id(value: &str, field: FieldName) -> Result<i64, Error> {
    value
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            let name = field.as_str();
            ValidationError::new(name, format!("{name} must be a positive integer"))
                .with_value(ErrorCode::InvalidId, value)
        })
}

pub(crate) fn parse_slugs(values: Vec<String>, field: FieldName) -> Result<Vec<Slug>, Error> {
    values
        .into_iter()
        .map(|value| {
            Slug::new(value.clone()).map_err(|_| {
                let name = field.as_str();
                ValidationError::new(name, format!("{name} must contain valid slugs"))
                    .with_value(ErrorCode::InvalidSlug, value)
            })
        })
        .collect()
}

/// Parse an optional `recipes_limit`: digits only, no sign.
pub(crate) fn parse_recipes_limit(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<usize>, Error> {
    let Some(raw) = value else {
        return Ok(None);
    };
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        let name = field.as_str();
        return Err(
            ValidationError::new(name, format!("{name} must be a non-negative integer"))
                .with_value(ErrorCode::InvalidNumber, raw),
        );
    }
    // Limits beyond usize are as good as no limit at all.
    Ok(Some(raw.parse().unwrap_or(usize::MAX)))
}

/// Interpret a `1`/`0` relation filter. Any other value leaves the filter
/// unset.
pub(crate) fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("1") => Some(true),
        Some("0") => Some(false),
        _ => None,
    }
}

pub(crate) fn pagination_error(error: PaginationError) -> Error {
    let field = match error {
        PaginationError::InvalidPage => pagination::PAGE_PARAM,
        PaginationError::InvalidLimit { .. } => pagination::LIMIT_PARAM,
    };
    ValidationError::new(field, error.to_string()).with_code(ErrorCode::InvalidPagination)
}

pub(crate) fn recipe_validation_error(error: RecipeValidationError) -> Error {
    ValidationError::new(error.field(), error.to_string()).with_code(ErrorCode::InvalidRecipe)
}
