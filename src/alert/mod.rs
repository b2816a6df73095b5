// ABOUTME: Incident alerting via PagerDuty Events v2.
// ABOUTME: Fired once per fatal run; failures here are logged, never raised.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::CiContext;

const EVENTS_URL: &str = "https://events.pagerduty.com/v2/enqueue";

/// Source tag identifying this tool in alert payloads.
const ALERT_SOURCE: &str = "metafora-deploy";

/// Rendered when the triggering event carried no commits.
const NO_RELATED_COMMITS: &str = "No related commits";

#[derive(Debug, Error)]
pub enum AlertError {
    /// The events API answers 202 on success; anything else is a rejection.
    #[error("alerting endpoint returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
}

/// An incident describing one fatal deployment failure.
#[derive(Debug, Clone)]
pub struct Incident {
    pub summary: String,
    pub timestamp: String,
    pub run_url: String,
    pub error_message: String,
    pub related_commits: String,
}

impl Incident {
    /// Build the incident for a fatal error in the given CI run.
    pub fn from_context(ctx: &CiContext, error_message: &str) -> Self {
        let related_commits = if ctx.commits.is_empty() {
            NO_RELATED_COMMITS.to_string()
        } else {
            ctx.commits
                .iter()
                .map(|commit| format!("{}: {}", commit.message, commit.url))
                .collect::<Vec<_>>()
                .join(", ")
        };

        Self {
            summary: format!(
                "{}: Error in \"{}\" run by @{}",
                ctx.repo_name(),
                ctx.workflow,
                ctx.actor
            ),
            timestamp: Utc::now().to_rfc3339(),
            run_url: ctx.run_url(),
            error_message: error_message.to_string(),
            related_commits,
        }
    }
}

/// Sink for fatal-failure incidents.
///
/// Dispatched at most once per run. This is a terminal sink: callers turn
/// errors into warnings so alerting can never crash the run it reports on.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn dispatch(&self, incident: &Incident) -> Result<(), AlertError>;
}

/// PagerDuty Events v2 dispatcher.
pub struct PagerDuty {
    http: Client,
    routing_key: Option<String>,
    endpoint: String,
}

impl PagerDuty {
    /// `routing_key` is None when alerting is not configured; dispatch then
    /// becomes a no-op.
    pub fn new(routing_key: Option<String>) -> Result<Self, AlertError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            routing_key,
            endpoint: EVENTS_URL.to_string(),
        })
    }
}

#[derive(Serialize)]
struct AlertEvent<'a> {
    payload: AlertPayload<'a>,
    routing_key: &'a str,
    event_action: &'a str,
}

#[derive(Serialize)]
struct AlertPayload<'a> {
    summary: &'a str,
    timestamp: &'a str,
    source: &'a str,
    severity: &'a str,
    custom_details: CustomDetails<'a>,
}

#[derive(Serialize)]
struct CustomDetails<'a> {
    run_details: &'a str,
    error_message: &'a str,
    related_commits: &'a str,
}

#[async_trait]
impl AlertSink for PagerDuty {
    async fn dispatch(&self, incident: &Incident) -> Result<(), AlertError> {
        let Some(routing_key) = &self.routing_key else {
            debug!("alerting not configured, skipping incident dispatch");
            return Ok(());
        };

        let event = AlertEvent {
            payload: AlertPayload {
                summary: &incident.summary,
                timestamp: &incident.timestamp,
                source: ALERT_SOURCE,
                severity: "critical",
                custom_details: CustomDetails {
                    run_details: &incident.run_url,
                    error_message: &incident.error_message,
                    related_commits: &incident.related_commits,
                },
            },
            routing_key,
            event_action: "trigger",
        };

        debug!("POST {}", self.endpoint);
        let response = self.http.post(&self.endpoint).json(&event).send().await?;

        if response.status() != StatusCode::ACCEPTED {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AlertError::Rejected { status, body });
        }

        Ok(())
    }
}
