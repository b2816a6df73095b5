// ABOUTME: Deploy command implementation.
// ABOUTME: Runs the pipeline and owns the partial-failure reporting policy.

use crate::alert::{AlertSink, Incident, PagerDuty};
use crate::auth::Credentials;
use crate::config::{CiContext, Config, Secrets};
use crate::deploy::{DeployError, Deployment, DeploymentOutcome, Uploaded};
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result};
use crate::github::{GithubClient, ReleaseSource};
use crate::output::Output;
use crate::platform::{AnypointClient, ArtifactOps, AuthOps, Environment, EnvironmentOps};
use crate::report::{OutcomeSink, TrackerReporter};

/// Deploy the configured release to its CloudHub application.
pub async fn deploy(config: Config, mut output: Output) -> Result<()> {
    let secrets = Secrets::from_env()?;
    let ctx = CiContext::from_env()?;

    let source = GithubClient::new(&ctx.api_url, &ctx.repository, &secrets.github_token)
        .map_err(|e| Error::Client(e.to_string()))?;
    let platform = AnypointClient::new(&secrets.anypoint_base_url)
        .map_err(|e| Error::Client(e.to_string()))?;
    let tracker = TrackerReporter::new(secrets.tracker.clone())
        .map_err(|e| Error::Client(e.to_string()))?;
    let alerts =
        PagerDuty::new(secrets.pagerduty_key.clone()).map_err(|e| Error::Client(e.to_string()))?;

    output.start_timer();
    run(
        &config,
        &secrets.credentials,
        &ctx,
        &source,
        &platform,
        &tracker,
        &alerts,
        &output,
    )
    .await
}

/// Run one deployment end to end against the given collaborators.
///
/// Failure policy: any pipeline error is fatal and fires exactly one
/// incident alert; the outcome report is always attempted exactly once,
/// success or failure; report and alert failures are downgraded to
/// warnings and never mask the pipeline result.
#[allow(clippy::too_many_arguments)]
pub async fn run<S, P, T, A>(
    config: &Config,
    credentials: &Credentials,
    ctx: &CiContext,
    source: &S,
    platform: &P,
    tracker: &T,
    alerts: &A,
    output: &Output,
) -> Result<()>
where
    S: ReleaseSource,
    P: AuthOps + EnvironmentOps + ArtifactOps,
    T: OutcomeSink,
    A: AlertSink,
{
    let mut diag = Diagnostics::default();

    output.progress(&format!(
        "Deploying release {} to {} ({})",
        config.release_tag, config.app_name, config.environment
    ));

    let (commit_sha, result) = run_pipeline(config, credentials, source, platform, output).await;

    if let Err(e) = &result {
        output.error(&e.to_string());
        let incident = Incident::from_context(ctx, &e.to_string());
        if let Err(alert_err) = alerts.dispatch(&incident).await {
            diag.warn(Warning::alert_dispatch(format!(
                "incident alert not delivered: {alert_err}"
            )));
        }
    }

    // One outcome record per run, no matter where the pipeline stopped.
    let outcome = DeploymentOutcome::new(config, ctx, commit_sha.as_deref(), result.is_ok());
    if let Err(report_err) = tracker.report(&outcome).await {
        diag.warn(Warning::outcome_report(format!(
            "deployment outcome not recorded: {report_err}"
        )));
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    match result {
        Ok(environment) => {
            output.success(&format!("{} updated successfully", environment.id));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Drive the state machine, keeping whatever commit SHA was gathered so the
/// outcome record can carry it even when a later stage fails.
async fn run_pipeline<S, P>(
    config: &Config,
    credentials: &Credentials,
    source: &S,
    platform: &P,
    output: &Output,
) -> (Option<String>, std::result::Result<Environment, DeployError>)
where
    S: ReleaseSource,
    P: AuthOps + EnvironmentOps + ArtifactOps,
{
    let deployment = Deployment::new(config.clone());

    output.progress(&format!("  → Fetching release {}...", config.release_tag));
    let fetched = match deployment.fetch_release(source).await {
        Ok(d) => d,
        Err(e) => return (None, Err(e)),
    };
    let commit_sha = fetched.commit_sha().map(str::to_string);
    output.progress(&format!("  → Selected asset: {}", fetched.asset().name));

    output.progress("  → Authenticating...");
    let authenticated = match fetched.authenticate(platform, credentials).await {
        Ok(d) => d,
        Err(e) => return (commit_sha, Err(e)),
    };

    output.progress("  → Downloading artifact...");
    let downloaded = match authenticated.download(source).await {
        Ok(d) => d,
        Err(e) => return (commit_sha, Err(e)),
    };
    output.progress(&format!(
        "  → Downloaded {} bytes",
        downloaded.artifact_len()
    ));

    output.progress("  → Uploading to CloudHub...");
    let uploaded: Deployment<Uploaded> = match downloaded.upload(platform).await {
        Ok(d) => d,
        Err(e) => return (commit_sha, Err(e)),
    };

    (commit_sha, Ok(uploaded.finish()))
}
