//! EmailAddress value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An email address accepted by the CRM site.
///
/// Input is trimmed before validation. The rules mirror what the site's own
/// validator rejects for lead forms: no whitespace, exactly one `@`, a
/// non-empty local part and a dotted domain whose last label is at least two
/// letters.
///
/// # Example
///
/// ```
/// use crm_followup_server::domain::EmailAddress;
///
/// let email = EmailAddress::new(" jane@example.com ").unwrap();
/// assert_eq!(email.as_str(), "jane@example.com");
/// assert_eq!(email.domain(), "example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new EmailAddress.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidEmail` carrying the original input.
    pub fn new(email: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = email.as_ref();
        let trimmed = raw.trim();
        match trimmed.split_once('@') {
            Some((local, domain)) if Self::local_ok(local) && Self::domain_ok(domain) => {
                Ok(Self(trimmed.to_string()))
            }
            _ => Err(ValidationError::InvalidEmail(raw.to_string())),
        }
    }

    /// Check without constructing.
    pub fn is_valid(email: &str) -> bool {
        Self::new(email).is_ok()
    }

    fn local_ok(local: &str) -> bool {
        !local.is_empty() && !local.chars().any(char::is_whitespace)
    }

    fn domain_ok(domain: &str) -> bool {
        if domain.contains('@') || domain.chars().any(char::is_whitespace) {
            return false;
        }
        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
            return false;
        }
        labels
            .last()
            .map(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
            .unwrap_or(false)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// The part after `@`.
    pub fn domain(&self) -> &str {
        self.0
            .split_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or_default()
    }
}

impl Serialize for EmailAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EmailAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EmailAddress::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
