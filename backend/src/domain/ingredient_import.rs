//! Ingredient catalogue seeding from CSV.
//!
//! Input rows are `name,measurement_unit` with no header. Extra columns are
//! ignored, surrounding whitespace is trimmed and repeated pairs collapse to
//! one. Pairs already in the catalogue are skipped, so an import can be
//! re-run against the same file.

use std::collections::HashSet;
use std::io::Read;
use std::sync::Arc;

use tracing::info;

use crate::domain::Error;
use crate::domain::ports::{IngredientImportRepository, IngredientImportRepositoryError};

/// Maximum ingredient name length, in characters.
pub const INGREDIENT_NAME_MAX: usize = 128;
/// Maximum measurement unit length, in characters.
pub const MEASUREMENT_UNIT_MAX: usize = 64;

/// Validation errors for [`NewIngredient`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NewIngredientError {
    #[error("ingredient name must not be empty")]
    EmptyName,
    #[error("ingredient name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("measurement unit must not be empty")]
    EmptyUnit,
    #[error("measurement unit must be at most {max} characters")]
    UnitTooLong { max: usize },
}

/// An ingredient waiting to be added to the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewIngredient {
    name: String,
    measurement_unit: String,
}

impl NewIngredient {
    /// Validate a trimmed `(name, measurement_unit)` pair.
    pub fn new(
        name: impl Into<String>,
        measurement_unit: impl Into<String>,
    ) -> Result<Self, NewIngredientError> {
        let name = name.into().trim().to_owned();
        let measurement_unit = measurement_unit.into().trim().to_owned();
        if name.is_empty() {
            return Err(NewIngredientError::EmptyName);
        }
        if name.chars().count() > INGREDIENT_NAME_MAX {
            return Err(NewIngredientError::NameTooLong {
                max: INGREDIENT_NAME_MAX,
            });
        }
        if measurement_unit.is_empty() {
            return Err(NewIngredientError::EmptyUnit);
        }
        if measurement_unit.chars().count() > MEASUREMENT_UNIT_MAX {
            return Err(NewIngredientError::UnitTooLong {
                max: MEASUREMENT_UNIT_MAX,
            });
        }
        Ok(Self {
            name,
            measurement_unit,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn measurement_unit(&self) -> &str {
        &self.measurement_unit
    }
}

/// Reasons a CSV file cannot be imported. Lines are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum IngredientCsvError {
    #[error("line {line}: malformed CSV: {message}")]
    Malformed { line: u64, message: String },
    #[error("line {line}: expected `name,measurement_unit`")]
    MissingColumn { line: u64 },
    #[error("line {line}: {source}")]
    InvalidRow {
        line: u64,
        #[source]
        source: NewIngredientError,
    },
}

/// Parse `name,measurement_unit` rows, keeping the first occurrence of each
/// pair in file order.
///
/// # Examples
/// ```
/// use foodgram_backend::domain::read_ingredient_csv;
///
/// let rows = read_ingredient_csv("flour,g\n\"salt, sea\",pinch\n".as_bytes())
///     .expect("valid CSV");
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[1].name(), "salt, sea");
/// ```
pub fn read_ingredient_csv<R: Read>(input: R) -> Result<Vec<NewIngredient>, IngredientCsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut seen = HashSet::new();
    let mut ingredients = Vec::new();
    for parsed in reader.records() {
        let record = parsed.map_err(|error| IngredientCsvError::Malformed {
            line: error.position().map_or(0, csv::Position::line),
            message: error.to_string(),
        })?;
        let line = record.position().map_or(0, csv::Position::line);
        let (Some(name), Some(unit)) = (record.get(0), record.get(1)) else {
            return Err(IngredientCsvError::MissingColumn { line });
        };
        let ingredient = NewIngredient::new(name, unit)
            .map_err(|source| IngredientCsvError::InvalidRow { line, source })?;
        if seen.insert(ingredient.clone()) {
            ingredients.push(ingredient);
        }
    }
    Ok(ingredients)
}

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Distinct pairs submitted.
    pub submitted: usize,
    /// Pairs that were not catalogued before.
    pub inserted: usize,
}

/// Writes parsed ingredients through the import repository.
pub struct IngredientImportService<R> {
    repo: Arc<R>,
}

impl<R> IngredientImportService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_import_error(error: IngredientImportRepositoryError) -> Error {
    match error {
        IngredientImportRepositoryError::Connection { message } => Error::service_unavailable(
            format!("ingredient import repository unavailable: {message}"),
        ),
        IngredientImportRepositoryError::Query { message } => {
            Error::internal(format!("ingredient import repository error: {message}"))
        }
    }
}

impl<R> IngredientImportService<R>
where
    R: IngredientImportRepository,
{
    /// Insert the pairs the catalogue does not hold yet.
    pub async fn import(&self, ingredients: &[NewIngredient]) -> Result<ImportSummary, Error> {
        let inserted = if ingredients.is_empty() {
            0
        } else {
            self.repo
                .insert_missing(ingredients)
                .await
                .map_err(map_import_error)?
        };
        let summary = ImportSummary {
            submitted: ingredients.len(),
            inserted,
        };
        info!(
            submitted = summary.submitted,
            inserted = summary.inserted,
            "ingredient import finished"
        );
        Ok(summary)
    }
}
