// ABOUTME: End-to-end pipeline tests against in-process collaborator mocks.
// ABOUTME: Verifies the partial-failure policy: one report, one alert, no masking.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use metafora::alert::{AlertError, AlertSink, Incident};
use metafora::auth::{AuthContext, AuthError, Credentials};
use metafora::commands;
use metafora::config::{CiContext, Config};
use metafora::deploy::{DeployErrorKind, DeploymentOutcome};
use metafora::error::Error;
use metafora::github::{Release, ReleaseAsset, ReleaseSource, SourceError};
use metafora::output::{Output, OutputMode};
use metafora::platform::{
    ArtifactOps, AuthOps, Environment, EnvironmentOps, PlatformError,
};
use metafora::report::{OutcomeSink, ReportError};
use metafora::types::{AppName, AssetId, EnvironmentId, OrganizationId, ReleaseTag};

// =============================================================================
// Mocks
// =============================================================================

struct StubSource {
    release: Option<Release>,
    commit: Option<String>,
    artifact: Bytes,
    downloads: AtomicUsize,
}

impl StubSource {
    fn with_release() -> Self {
        Self {
            release: Some(release()),
            commit: Some("abc123".to_string()),
            artifact: Bytes::from(vec![0u8; 512]),
            downloads: AtomicUsize::new(0),
        }
    }

    fn without_release() -> Self {
        Self {
            release: None,
            ..Self::with_release()
        }
    }
}

#[async_trait]
impl ReleaseSource for StubSource {
    async fn get_release(&self, tag: &ReleaseTag) -> Result<Release, SourceError> {
        self.release
            .clone()
            .ok_or_else(|| SourceError::ReleaseNotFound {
                tag: tag.to_string(),
            })
    }

    async fn get_commit_sha(&self, _tag: &ReleaseTag) -> Result<String, SourceError> {
        self.commit
            .clone()
            .ok_or_else(|| SourceError::CommitLookup("ref lookup failed".to_string()))
    }

    async fn download_asset(&self, _asset: &ReleaseAsset) -> Result<Bytes, SourceError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        Ok(self.artifact.clone())
    }
}

#[derive(Debug)]
struct UploadRecord {
    environment_id: String,
    artifact_name: String,
    bytes: usize,
}

struct StubPlatform {
    token_ok: bool,
    environments: Vec<Environment>,
    reject_upload: bool,
    token_calls: AtomicUsize,
    list_calls: AtomicUsize,
    uploads: Mutex<Vec<UploadRecord>>,
}

impl StubPlatform {
    fn new(environments: Vec<Environment>) -> Self {
        Self {
            token_ok: true,
            environments,
            reject_upload: false,
            token_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            uploads: Mutex::new(Vec::new()),
        }
    }

    fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl AuthOps for StubPlatform {
    async fn acquire_token(
        &self,
        _client_id: &str,
        _client_secret: &str,
    ) -> Result<String, AuthError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        if self.token_ok {
            Ok("tok-123".to_string())
        } else {
            Err(AuthError::TokenExchange {
                status: 401,
                body: "invalid client".to_string(),
            })
        }
    }
}

#[async_trait]
impl EnvironmentOps for StubPlatform {
    async fn list_environments(
        &self,
        _org_id: &OrganizationId,
        _auth: &AuthContext,
    ) -> Result<Vec<Environment>, PlatformError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.environments.clone())
    }
}

#[async_trait]
impl ArtifactOps for StubPlatform {
    async fn upload_artifact(
        &self,
        environment: &Environment,
        _app_name: &AppName,
        artifact: Bytes,
        artifact_name: &str,
        _auth: &AuthContext,
    ) -> Result<(), PlatformError> {
        self.uploads.lock().unwrap().push(UploadRecord {
            environment_id: environment.id.to_string(),
            artifact_name: artifact_name.to_string(),
            bytes: artifact.len(),
        });
        if self.reject_upload {
            return Err(PlatformError::Upload {
                status: 500,
                body: "upload rejected".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
struct RecordingTracker {
    fail: bool,
    outcomes: Mutex<Vec<DeploymentOutcome>>,
}

impl RecordingTracker {
    fn outcomes(&self) -> Vec<DeploymentOutcome> {
        self.outcomes.lock().unwrap().clone()
    }
}

#[async_trait]
impl OutcomeSink for RecordingTracker {
    async fn report(&self, outcome: &DeploymentOutcome) -> Result<(), ReportError> {
        self.outcomes.lock().unwrap().push(outcome.clone());
        if self.fail {
            return Err(ReportError::Rejected {
                status: 503,
                body: "tracker down".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
struct RecordingAlerts {
    fail: bool,
    incidents: Mutex<Vec<Incident>>,
}

impl RecordingAlerts {
    fn incidents(&self) -> Vec<Incident> {
        self.incidents.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertSink for RecordingAlerts {
    async fn dispatch(&self, incident: &Incident) -> Result<(), AlertError> {
        self.incidents.lock().unwrap().push(incident.clone());
        if self.fail {
            return Err(AlertError::Rejected {
                status: 400,
                body: "bad event".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn release() -> Release {
    Release {
        id: 99,
        tag_name: "v1.2.3".to_string(),
        assets: vec![
            ReleaseAsset {
                id: AssetId::new(1),
                name: "checksums.txt".to_string(),
                size: 64,
            },
            ReleaseAsset {
                id: AssetId::new(2),
                name: "app-v1.2.3.zip".to_string(),
                size: 512,
            },
        ],
    }
}

fn environments() -> Vec<Environment> {
    vec![
        Environment {
            id: EnvironmentId::new("env-staging"),
            name: "Staging".to_string(),
        },
        Environment {
            id: EnvironmentId::new("env-prod"),
            name: "Production".to_string(),
        },
    ]
}

fn config(environment: &str) -> Config {
    Config::new(
        ReleaseTag::new("v1.2.3").unwrap(),
        environment.to_string(),
        AppName::new("billing-api").unwrap(),
        None,
    )
}

fn context() -> CiContext {
    CiContext {
        repository: "acme/billing".to_string(),
        api_url: "https://api.github.com".to_string(),
        server_url: "https://github.com".to_string(),
        workflow: "release".to_string(),
        actor: "octocat".to_string(),
        run_id: "42".to_string(),
        commits: Vec::new(),
    }
}

fn basic_credentials() -> Credentials {
    Credentials::Basic {
        username: "deployer".to_string(),
        password: "hunter2".to_string(),
    }
}

fn oauth_credentials() -> Credentials {
    Credentials::OAuth {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
    }
}

fn output() -> Output {
    Output::new(OutputMode::Quiet)
}

fn deploy_error_kind(err: Error) -> DeployErrorKind {
    match err {
        Error::Deploy(e) => e.kind(),
        other => panic!("expected a deployment error, got: {other}"),
    }
}

async fn run(
    config: &Config,
    credentials: &Credentials,
    source: &StubSource,
    platform: &StubPlatform,
    tracker: &RecordingTracker,
    alerts: &RecordingAlerts,
) -> Result<(), Error> {
    commands::run(
        config,
        credentials,
        &context(),
        source,
        platform,
        tracker,
        alerts,
        &output(),
    )
    .await
}

// =============================================================================
// Scenarios
// =============================================================================

/// Scenario: the happy path. One report with is_successful=true, no alerts.
#[tokio::test]
async fn successful_run_reports_once_and_never_alerts() {
    let source = StubSource::with_release();
    let platform = StubPlatform::new(environments());
    let tracker = RecordingTracker::default();
    let alerts = RecordingAlerts::default();

    let result = run(
        &config("staging"),
        &basic_credentials(),
        &source,
        &platform,
        &tracker,
        &alerts,
    )
    .await;

    assert!(result.is_ok());
    assert!(alerts.incidents().is_empty());

    let outcomes = tracker.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_successful);
    assert_eq!(outcomes[0].version, "v1.2.3");
    assert_eq!(outcomes[0].commit_sha, "abc123");
    assert_eq!(outcomes[0].environment, "staging");

    let uploads = platform.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].environment_id, "env-staging");
    assert_eq!(uploads[0].artifact_name, "app-v1.2.3.zip");
    assert_eq!(uploads[0].bytes, 512);
}

/// Scenario: the requested environment is not in the organization listing.
#[tokio::test]
async fn unknown_environment_fails_alerts_and_reports() {
    let source = StubSource::with_release();
    let platform = StubPlatform::new(environments());
    let tracker = RecordingTracker::default();
    let alerts = RecordingAlerts::default();

    let result = run(
        &config("qa"),
        &basic_credentials(),
        &source,
        &platform,
        &tracker,
        &alerts,
    )
    .await;

    assert_eq!(
        deploy_error_kind(result.unwrap_err()),
        DeployErrorKind::EnvironmentNotFound
    );
    assert_eq!(platform.upload_count(), 0);

    let incidents = alerts.incidents();
    assert_eq!(incidents.len(), 1);
    assert!(incidents[0].error_message.contains("qa"));

    let outcomes = tracker.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].is_successful);
}

#[tokio::test]
async fn rejected_upload_is_fatal_with_one_alert_and_one_report() {
    let source = StubSource::with_release();
    let mut platform = StubPlatform::new(environments());
    platform.reject_upload = true;
    let tracker = RecordingTracker::default();
    let alerts = RecordingAlerts::default();

    let result = run(
        &config("staging"),
        &basic_credentials(),
        &source,
        &platform,
        &tracker,
        &alerts,
    )
    .await;

    assert_eq!(
        deploy_error_kind(result.unwrap_err()),
        DeployErrorKind::UploadRejected
    );
    assert_eq!(alerts.incidents().len(), 1);

    let outcomes = tracker.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].is_successful);
}

/// A failure before the commit lookup still produces exactly one report,
/// with an empty commit field.
#[tokio::test]
async fn missing_release_reports_with_empty_commit() {
    let source = StubSource::without_release();
    let platform = StubPlatform::new(environments());
    let tracker = RecordingTracker::default();
    let alerts = RecordingAlerts::default();

    let result = run(
        &config("staging"),
        &basic_credentials(),
        &source,
        &platform,
        &tracker,
        &alerts,
    )
    .await;

    assert_eq!(
        deploy_error_kind(result.unwrap_err()),
        DeployErrorKind::ReleaseNotFound
    );
    assert_eq!(alerts.incidents().len(), 1);

    let outcomes = tracker.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].commit_sha, "");
    assert!(!outcomes[0].is_successful);
}

/// Token acquisition failure aborts before any download or platform call.
#[tokio::test]
async fn token_failure_skips_download_and_upload() {
    let source = StubSource::with_release();
    let mut platform = StubPlatform::new(environments());
    platform.token_ok = false;
    let tracker = RecordingTracker::default();
    let alerts = RecordingAlerts::default();

    let result = run(
        &config("staging"),
        &oauth_credentials(),
        &source,
        &platform,
        &tracker,
        &alerts,
    )
    .await;

    assert_eq!(
        deploy_error_kind(result.unwrap_err()),
        DeployErrorKind::AuthFailed
    );
    assert_eq!(platform.token_calls.load(Ordering::SeqCst), 1);
    assert_eq!(source.downloads.load(Ordering::SeqCst), 0);
    assert_eq!(platform.list_calls.load(Ordering::SeqCst), 0);
    assert_eq!(platform.upload_count(), 0);
    assert_eq!(alerts.incidents().len(), 1);
    assert_eq!(tracker.outcomes().len(), 1);
}

#[tokio::test]
async fn environment_match_is_case_insensitive() {
    let source = StubSource::with_release();
    let platform = StubPlatform::new(environments());
    let tracker = RecordingTracker::default();
    let alerts = RecordingAlerts::default();

    let result = run(
        &config("PRODUCTION"),
        &basic_credentials(),
        &source,
        &platform,
        &tracker,
        &alerts,
    )
    .await;

    assert!(result.is_ok());
    let uploads = platform.uploads.lock().unwrap();
    assert_eq!(uploads[0].environment_id, "env-prod");
}

#[tokio::test]
async fn commit_lookup_failure_degrades_to_empty_commit() {
    let mut source = StubSource::with_release();
    source.commit = None;
    let platform = StubPlatform::new(environments());
    let tracker = RecordingTracker::default();
    let alerts = RecordingAlerts::default();

    let result = run(
        &config("staging"),
        &basic_credentials(),
        &source,
        &platform,
        &tracker,
        &alerts,
    )
    .await;

    assert!(result.is_ok());
    assert!(alerts.incidents().is_empty());

    let outcomes = tracker.outcomes();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_successful);
    assert_eq!(outcomes[0].commit_sha, "");
}

#[tokio::test]
async fn report_failure_does_not_mask_success() {
    let source = StubSource::with_release();
    let platform = StubPlatform::new(environments());
    let tracker = RecordingTracker {
        fail: true,
        ..Default::default()
    };
    let alerts = RecordingAlerts::default();

    let result = run(
        &config("staging"),
        &basic_credentials(),
        &source,
        &platform,
        &tracker,
        &alerts,
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(tracker.outcomes().len(), 1);
}

#[tokio::test]
async fn alert_failure_does_not_mask_the_pipeline_error() {
    let source = StubSource::with_release();
    let mut platform = StubPlatform::new(environments());
    platform.reject_upload = true;
    let tracker = RecordingTracker::default();
    let alerts = RecordingAlerts {
        fail: true,
        ..Default::default()
    };

    let result = run(
        &config("staging"),
        &basic_credentials(),
        &source,
        &platform,
        &tracker,
        &alerts,
    )
    .await;

    assert_eq!(
        deploy_error_kind(result.unwrap_err()),
        DeployErrorKind::UploadRejected
    );
    // The outcome report still happened exactly once.
    assert_eq!(tracker.outcomes().len(), 1);
}
