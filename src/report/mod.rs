// ABOUTME: Best-effort deployment outcome reporting to a tracking service.
// ABOUTME: Failures here never change the result of the run.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::TrackerConfig;
use crate::deploy::DeploymentOutcome;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("tracking endpoint returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Sink for deployment outcome records.
///
/// Called exactly once per run, after the pipeline completes or fails.
/// Callers convert errors into warnings; nothing here is fatal.
#[async_trait]
pub trait OutcomeSink: Send + Sync {
    async fn report(&self, outcome: &DeploymentOutcome) -> Result<(), ReportError>;
}

/// Reporter posting outcomes to the configured tracking endpoint.
pub struct TrackerReporter {
    http: Client,
    config: Option<TrackerConfig>,
}

impl TrackerReporter {
    /// `config` is None when tracking is not configured for this pipeline;
    /// reporting then becomes a no-op.
    pub fn new(config: Option<TrackerConfig>) -> Result<Self, ReportError> {
        let http = Client::builder().build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl OutcomeSink for TrackerReporter {
    async fn report(&self, outcome: &DeploymentOutcome) -> Result<(), ReportError> {
        let Some(config) = &self.config else {
            debug!("deployment tracking not configured, skipping outcome report");
            return Ok(());
        };

        debug!("POST {}", config.url);
        let response = self
            .http
            .post(&config.url)
            .bearer_auth(&config.token)
            .json(outcome)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::Rejected { status, body });
        }

        Ok(())
    }
}
