//! Identifier validation
//!
//! Table and column names are spliced into SQL text between backticks, so
//! every name a descriptor or join carries is checked once, up front.

use std::fmt;
use thiserror::Error;

use crate::query_builder::filter::FilterKey;

/// MySQL identifier length limit
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("identifier cannot be empty")]
    Empty,

    #[error("identifier `{name}` has {length} characters, at most {max_length} are allowed")]
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },

    #[error("identifier `{0}` must start with an ASCII letter or `_`")]
    InvalidStartCharacter(String),

    #[error("identifier `{0}` may only contain ASCII letters, digits and `_`")]
    InvalidCharacters(String),

    /// Would be read back as `column__op`
    #[error("column `{0}` ends in an operator suffix")]
    AmbiguousSuffix(String),

    #[error("column `{0}` is listed more than once")]
    DuplicateColumn(String),
}

fn check_identifier(name: &str) -> Result<(), ValidationError> {
    let Some(first) = name.chars().next() else {
        return Err(ValidationError::Empty);
    };
    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            length: name.len(),
            max_length: MAX_IDENTIFIER_LENGTH,
        });
    }
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(ValidationError::InvalidStartCharacter(name.to_string()));
    }
    if name.chars().any(|c| !(c.is_ascii_alphanumeric() || c == '_')) {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }
    Ok(())
}

/// Table name safe to place between backticks
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedTableName(String);

impl ValidatedTableName {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        check_identifier(name)?;
        Ok(Self(name.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Column name that is safe in SQL and unambiguous as a filter key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedFieldName(String);

impl ValidatedFieldName {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        check_identifier(name)?;
        if FilterKey::parse(name).column != name {
            return Err(ValidationError::AmbiguousSuffix(name.to_owned()));
        }
        Ok(Self(name.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ValidatedTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ValidatedFieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
