//! Check identifiers.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Identifier of a validation check, e.g. `citations-resolve`.
///
/// Identifiers are lowercase kebab-case. Compiled-in checks construct
/// theirs with [`CheckId::from_static`]; identifiers read from checklist
/// text go through [`CheckId::parse`], which validates the form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CheckId(Cow<'static, str>);

impl CheckId {
    /// Wraps a compiled-in identifier literal without allocating.
    #[must_use]
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Parses and validates an identifier from arbitrary text.
    ///
    /// # Errors
    ///
    /// Returns [`CheckIdError`] unless the input is non-empty kebab-case:
    /// lowercase ASCII alphanumeric segments separated by single hyphens,
    /// starting with a letter.
    pub fn parse(id: &str) -> Result<Self, CheckIdError> {
        if id.is_empty() {
            return Err(CheckIdError::Empty);
        }
        let valid_shape = id.split('-').all(|segment| {
            !segment.is_empty()
                && segment.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        });
        if !valid_shape || !id.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(CheckIdError::InvalidFormat(id.to_string()));
        }
        Ok(Self(Cow::Owned(id.to_string())))
    }

    /// The identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CheckId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CheckId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CheckId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for CheckId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CheckId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Error validating a [`CheckId`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckIdError {
    /// The identifier was empty.
    #[error("check id is empty")]
    Empty,

    /// The identifier is not lowercase kebab-case.
    #[error("check id `{0}` is not lowercase kebab-case")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepts_kebab_case() {
        for id in ["metadata-presence", "citations-resolve", "x", "a1-b2"] {
            assert_eq!(CheckId::parse(id).unwrap().as_str(), id);
        }
    }

    #[test]
    fn rejects_bad_shapes() {
        for bad in ["", "Metadata", "has space", "double--dash", "-leading", "trailing-", "1starts-digit", "under_score"] {
            assert!(CheckId::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn static_and_parsed_compare_equal() {
        let a = CheckId::from_static("task-coverage");
        let b = CheckId::parse("task-coverage").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "task-coverage");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = CheckId::from_static("criteria-quality");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"criteria-quality\"");
        let back: CheckId = serde_json::from_str("\"criteria-quality\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<CheckId>("\"NOT VALID\"").is_err());
    }
}
