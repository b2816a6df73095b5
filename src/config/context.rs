// ABOUTME: CI run context read from the GitHub Actions environment.
// ABOUTME: Supplies repository coordinates, run metadata, and event commits.

use std::env;
use std::fs;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Context of the CI run that invoked the deployment.
#[derive(Debug, Clone)]
pub struct CiContext {
    /// `owner/repo` slug of the repository being deployed.
    pub repository: String,
    /// Source-control API base URL.
    pub api_url: String,
    /// Web base URL, used to build the run-details link.
    pub server_url: String,
    /// Name of the triggering workflow.
    pub workflow: String,
    /// Login of the actor that triggered the run.
    pub actor: String,
    /// Identifier of this workflow run.
    pub run_id: String,
    /// Commits carried by the triggering event, if any.
    pub commits: Vec<CommitRef>,
}

/// A commit reference from the triggering event payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRef {
    pub message: String,
    pub url: String,
}

#[derive(Deserialize)]
struct EventPayload {
    #[serde(default)]
    commits: Vec<CommitRef>,
}

impl CiContext {
    /// Build the context from `GITHUB_*` variables.
    ///
    /// Only the repository slug is hard-required; everything else degrades
    /// to a placeholder so a fatal deployment error can still be alerted on.
    pub fn from_env() -> Result<Self> {
        let repository = env::var("GITHUB_REPOSITORY")
            .map_err(|_| Error::MissingEnvVar("GITHUB_REPOSITORY".to_string()))?;

        Ok(Self {
            repository,
            api_url: var_or("GITHUB_API_URL", DEFAULT_API_URL),
            server_url: var_or("GITHUB_SERVER_URL", DEFAULT_SERVER_URL),
            workflow: var_or("GITHUB_WORKFLOW", "unknown"),
            actor: var_or("GITHUB_ACTOR", "unknown"),
            run_id: var_or("GITHUB_RUN_ID", ""),
            commits: load_event_commits(),
        })
    }

    /// Repository name without the owner prefix.
    pub fn repo_name(&self) -> &str {
        self.repository
            .split_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.repository)
    }

    /// Link to this workflow run.
    pub fn run_url(&self) -> String {
        format!(
            "{}/{}/actions/runs/{}",
            self.server_url, self.repository, self.run_id
        )
    }
}

/// Read the commit list from the event payload file, if present.
///
/// Non-push events have no commits; a missing or malformed payload is not
/// worth failing a deployment over.
fn load_event_commits() -> Vec<CommitRef> {
    let Ok(path) = env::var("GITHUB_EVENT_PATH") else {
        return Vec::new();
    };

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!("could not read event payload {path}: {e}");
            return Vec::new();
        }
    };

    match serde_json::from_str::<EventPayload>(&raw) {
        Ok(payload) => payload.commits,
        Err(e) => {
            tracing::debug!("could not parse event payload {path}: {e}");
            Vec::new()
        }
    }
}

fn var_or(var: &str, default: &str) -> String {
    match env::var(var) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}
