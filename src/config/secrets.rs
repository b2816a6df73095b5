// ABOUTME: Secret and endpoint configuration read from the environment.
// ABOUTME: Credential strategy selection happens here, once per run.

use std::env;

use crate::auth::Credentials;
use crate::error::{Error, Result};

pub const DEFAULT_ANYPOINT_BASE_URL: &str = "https://anypoint.mulesoft.com";

/// Secrets and optional collaborator endpoints for one run.
///
/// All lookups happen in `from_env` so a misconfigured pipeline fails before
/// the first network call.
#[derive(Debug, Clone)]
pub struct Secrets {
    /// Source-control API token.
    pub github_token: String,
    /// Deployment-platform credentials, variant fixed at load time.
    pub credentials: Credentials,
    /// Deployment-platform base URL.
    pub anypoint_base_url: String,
    /// Incident alerting routing key; alerting is disabled when unset.
    pub pagerduty_key: Option<String>,
    /// Deployment-tracking endpoint; tracking is disabled when unset.
    pub tracker: Option<TrackerConfig>,
}

/// Endpoint and bearer token for the deployment-tracking service.
///
/// This credential is unrelated to the deployment-platform credentials.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub url: String,
    pub token: String,
}

impl Secrets {
    pub fn from_env() -> Result<Self> {
        let github_token = required("GITHUB_TOKEN")?;
        let credentials = Credentials::from_env()?;
        let anypoint_base_url =
            optional("ANYPOINT_BASE_URL").unwrap_or_else(|| DEFAULT_ANYPOINT_BASE_URL.to_string());

        let tracker = match (optional("DEPLOY_TRACKER_URL"), optional("DEPLOY_TRACKER_TOKEN")) {
            (Some(url), Some(token)) => Some(TrackerConfig { url, token }),
            (Some(_), None) => return Err(Error::MissingEnvVar("DEPLOY_TRACKER_TOKEN".into())),
            _ => None,
        };

        Ok(Self {
            github_token,
            credentials,
            anypoint_base_url,
            pagerduty_key: optional("PAGERDUTY_INTEGRATION_KEY"),
            tracker,
        })
    }
}

impl Credentials {
    /// Select the credential strategy from what the environment provides.
    ///
    /// OAuth client credentials take precedence when both pairs are set.
    /// The choice is made here, once; no call site branches on it again.
    pub fn from_env() -> Result<Self> {
        if let (Some(client_id), Some(client_secret)) =
            (optional("ANYPOINT_CLIENT_ID"), optional("ANYPOINT_CLIENT_SECRET"))
        {
            return Ok(Credentials::OAuth {
                client_id,
                client_secret,
            });
        }

        if let (Some(username), Some(password)) =
            (optional("CLOUDHUB_USER"), optional("CLOUDHUB_PASSWORD"))
        {
            return Ok(Credentials::Basic { username, password });
        }

        Err(Error::MissingCredentials)
    }
}

fn required(var: &str) -> Result<String> {
    optional(var).ok_or_else(|| Error::MissingEnvVar(var.to_string()))
}

/// Read a variable, treating empty values as unset the way CI runners
/// pass through undefined secrets.
fn optional(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
