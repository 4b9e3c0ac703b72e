//! Case-insensitive class identity.
//!
//! Full names are `schema:class`. Input may also use `.` as the separator;
//! both spell the same key once normalized.

use crate::{ALT_FULL_NAME_SEPARATOR, FULL_NAME_SEPARATOR};
use derive_more::Display;
use serde::Serialize;
use thiserror::Error as ThisError;

///
/// KeyError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum KeyError {
    #[error("class full name is empty")]
    Empty,

    #[error("class full name '{0}' is not of the form 'schema:class'")]
    Malformed(String),
}

///
/// ClassKey
///
/// Normalized map key for one class. Two full names that differ only in
/// case (or in `.` vs `:`) produce equal keys.
///

#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{_0}")]
pub struct ClassKey(String);

impl ClassKey {
    /// Normalize a full name into a key. Never fails; malformed names simply
    /// produce keys nothing is registered under.
    #[must_use]
    pub fn new(full_name: &str) -> Self {
        let lowered = full_name.trim().to_lowercase();

        if lowered.contains(FULL_NAME_SEPARATOR) {
            return Self(lowered);
        }

        Self(lowered.replacen(ALT_FULL_NAME_SEPARATOR, &FULL_NAME_SEPARATOR.to_string(), 1))
    }

    #[must_use]
    pub fn from_parts(schema: &str, class: &str) -> Self {
        Self::new(&format!("{schema}{FULL_NAME_SEPARATOR}{class}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Schema part of the key, if the key carries a separator.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.0.split_once(FULL_NAME_SEPARATOR).map(|(schema, _)| schema)
    }
}

/// Case-insensitive name comparison using the same folding as [`ClassKey`].
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

impl From<&ClassName> for ClassKey {
    fn from(name: &ClassName) -> Self {
        Self::from_parts(&name.schema, &name.class)
    }
}

///
/// ClassName
///
/// Declared-case `(schema, class)` pair. This is what registered classes
/// report as their name; lookups go through [`ClassKey`].
///

#[derive(Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[display("{schema}:{class}")]
pub struct ClassName {
    schema: String,
    class: String,
}

impl ClassName {
    #[must_use]
    pub fn new(schema: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            class: class.into(),
        }
    }

    /// Split a full name on its first `:` (or `.`) separator.
    pub fn parse(full_name: &str) -> Result<Self, KeyError> {
        let trimmed = full_name.trim();
        if trimmed.is_empty() {
            return Err(KeyError::Empty);
        }

        let (schema, class) = trimmed
            .split_once(FULL_NAME_SEPARATOR)
            .or_else(|| trimmed.split_once(ALT_FULL_NAME_SEPARATOR))
            .ok_or_else(|| KeyError::Malformed(trimmed.to_string()))?;

        let (schema, class) = (schema.trim(), class.trim());
        if schema.is_empty() || class.is_empty() {
            return Err(KeyError::Malformed(trimmed.to_string()));
        }

        Ok(Self::new(schema, class))
    }

    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        self.to_string()
    }

    #[must_use]
    pub fn key(&self) -> ClassKey {
        ClassKey::from(self)
    }
}
