// ABOUTME: Environment model and name resolution.
// ABOUTME: Names match case-insensitively; first listing match wins.

use serde::Deserialize;

use super::error::PlatformError;
use crate::types::EnvironmentId;

/// A named deployment target within an organization.
#[derive(Debug, Clone, Deserialize)]
pub struct Environment {
    pub id: EnvironmentId,
    pub name: String,
}

/// Resolve an environment name against the organization's listing.
///
/// Matching is a case-insensitive exact comparison. Zero matches is an
/// error; with several matches (the platform does not forbid duplicate
/// names) the first one in listing order is used.
pub fn resolve_environment(
    environments: Vec<Environment>,
    name: &str,
) -> Result<Environment, PlatformError> {
    environments
        .into_iter()
        .find(|env| env.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| PlatformError::EnvironmentNotFound {
            name: name.to_string(),
        })
}
