// ABOUTME: Validated release tag newtype.
// ABOUTME: Enforces git refname rules so tags are safe in URL path segments.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReleaseTagError {
    #[error("release tag cannot be empty")]
    Empty,

    #[error("release tag exceeds maximum length of 128 characters")]
    TooLong,

    #[error("release tag cannot contain whitespace")]
    ContainsWhitespace,

    #[error("invalid character in release tag: '{0}'")]
    InvalidChar(char),
}

/// A git release tag, e.g. `v1.2.3`.
///
/// Tags travel as URL path segments on every source-control call, so the
/// character set is restricted to what git refnames allow minus separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseTag(String);

impl ReleaseTag {
    pub fn new(value: &str) -> Result<Self, ReleaseTagError> {
        if value.is_empty() {
            return Err(ReleaseTagError::Empty);
        }

        if value.len() > 128 {
            return Err(ReleaseTagError::TooLong);
        }

        for c in value.chars() {
            if c.is_whitespace() {
                return Err(ReleaseTagError::ContainsWhitespace);
            }
            if !c.is_ascii_alphanumeric() && !matches!(c, '.' | '-' | '_' | '+') {
                return Err(ReleaseTagError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
