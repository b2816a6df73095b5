// ABOUTME: Deployment outcome record sent to the tracking service.
// ABOUTME: Built exactly once per run, for successes and failures alike.

use chrono::Utc;
use serde::Serialize;

use crate::config::{CiContext, Config};

/// The structured outcome of one deployment run.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentOutcome {
    /// Release tag that was deployed.
    pub version: String,
    /// Commit the tag points at; empty when the lookup failed or never ran.
    pub commit_sha: String,
    /// `owner/repo` slug of the deployed repository.
    pub repository: String,
    /// Requested environment name.
    pub environment: String,
    pub is_successful: bool,
    /// RFC 3339 timestamp of when the outcome was recorded.
    pub timestamp: String,
}

impl DeploymentOutcome {
    pub fn new(
        config: &Config,
        ctx: &CiContext,
        commit_sha: Option<&str>,
        is_successful: bool,
    ) -> Self {
        Self {
            version: config.release_tag.to_string(),
            commit_sha: commit_sha.unwrap_or_default().to_string(),
            repository: ctx.repository.clone(),
            environment: config.environment.clone(),
            is_successful,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
