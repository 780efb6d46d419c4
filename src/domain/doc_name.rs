//! DocName value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Widest name the host stores in its `name` column.
const MAX_NAME_LEN: usize = 140;

/// The primary key of a document on the CRM site (`name` in the REST API).
///
/// Names arrive from tool callers as free text, so surrounding whitespace is
/// trimmed and blank or oversized names are rejected before they reach a URL.
///
/// # Example
///
/// ```
/// use crm_followup_server::domain::DocName;
///
/// let name = DocName::new("  Jane Doe-0001 ").unwrap();
/// assert_eq!(name.as_str(), "Jane Doe-0001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocName(String);

impl DocName {
    /// Create a new DocName.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyName` for blank input and
    /// `ValidationError::NameTooLong` past 140 characters.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let len = trimmed.chars().count();
        if len > MAX_NAME_LEN {
            return Err(ValidationError::NameTooLong(len));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Serialize for DocName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DocName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DocName::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for DocName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
