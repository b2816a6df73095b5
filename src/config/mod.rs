// ABOUTME: Configuration types for a deployment run.
// ABOUTME: The request is built once from CLI inputs and never mutated.

mod context;
mod secrets;

pub use context::{CiContext, CommitRef};
pub use secrets::{DEFAULT_ANYPOINT_BASE_URL, Secrets, TrackerConfig};

use crate::types::{AppName, OrganizationId, ReleaseTag};

/// Organization used when no `--org-id` is given.
///
/// Applied exactly once, in `Config::new`; nothing downstream falls back to
/// this constant.
pub const DEFAULT_ORG_ID: &str = "5d528c97-b639-428c-bd03-bf3b247075c9";

/// The immutable deployment request: which release goes where.
#[derive(Debug, Clone)]
pub struct Config {
    pub release_tag: ReleaseTag,
    pub environment: String,
    pub app_name: AppName,
    pub org_id: OrganizationId,
}

impl Config {
    pub fn new(
        release_tag: ReleaseTag,
        environment: String,
        app_name: AppName,
        org_id: Option<String>,
    ) -> Self {
        let org_id = OrganizationId::new(org_id.unwrap_or_else(|| DEFAULT_ORG_ID.to_string()));
        Self {
            release_tag,
            environment,
            app_name,
            org_id,
        }
    }
}
