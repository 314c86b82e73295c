//! Short codes used by shareable recipe links.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of characters in a short code.
pub const SHORT_CODE_LEN: usize = 5;

/// How many codes recipe creation tries before giving up on collisions.
pub const SHORT_CODE_ATTEMPTS: usize = 5;

/// Validation errors for [`ShortCode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortCodeValidationError {
    #[error("short code must be exactly {expected} characters")]
    WrongLength { expected: usize },
    #[error("short code may only contain ASCII letters and digits")]
    InvalidCharacters,
}

/// Immutable, globally unique five character code assigned at creation.
///
/// # Examples
/// ```
/// use foodgram_backend::domain::{SHORT_CODE_LEN, ShortCode};
///
/// let code = ShortCode::generate();
/// assert_eq!(code.as_ref().len(), SHORT_CODE_LEN);
/// assert!(ShortCode::new(code.as_ref()).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

impl ShortCode {
    /// Validate a code received from a client or read from storage.
    pub fn new(value: impl Into<String>) -> Result<Self, ShortCodeValidationError> {
        let value = value.into();
        if value.chars().count() != SHORT_CODE_LEN {
            return Err(ShortCodeValidationError::WrongLength {
                expected: SHORT_CODE_LEN,
            });
        }
        if !value.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(ShortCodeValidationError::InvalidCharacters);
        }
        Ok(Self(value))
    }

    /// Draw a fresh code from the leading hex digits of a random UUID.
    ///
    /// Uniqueness is not checked here; the store's unique constraint decides.
    pub fn generate() -> Self {
        let mut raw = Uuid::new_v4().simple().to_string();
        raw.truncate(SHORT_CODE_LEN);
        Self(raw)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ShortCode> for String {
    fn from(value: ShortCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for ShortCode {
    type Error = ShortCodeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
