// ABOUTME: Stage-tagged deployment error with SNAFU pattern.
// ABOUTME: Unifies source, auth, and platform errors for programmatic handling.

use snafu::Snafu;

use crate::auth::AuthError;
use crate::github::SourceError;
use crate::platform::PlatformError;

/// Unified error for the deployment pipeline, tagged with the stage that
/// failed. Any of these is fatal to the run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DeployError {
    #[snafu(display("release fetch failed: {source}"))]
    Fetch { source: SourceError },

    #[snafu(display("authentication failed: {source}"))]
    Auth { source: AuthError },

    #[snafu(display("artifact download failed: {source}"))]
    Download { source: SourceError },

    #[snafu(display("artifact upload failed: {source}"))]
    Upload { source: PlatformError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// The tag does not resolve to a release.
    ReleaseNotFound,
    /// The release has no asset matching the tag.
    NoMatchingAsset,
    /// The artifact could not be downloaded intact.
    DownloadFailed,
    /// Token exchange was rejected.
    AuthFailed,
    /// The requested environment does not exist in the organization.
    EnvironmentNotFound,
    /// The platform rejected the upload.
    UploadRejected,
    /// Transport or unexpected API failure.
    Transport,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Fetch { source } => match source {
                SourceError::ReleaseNotFound { .. } => DeployErrorKind::ReleaseNotFound,
                SourceError::NoMatchingAsset { .. } => DeployErrorKind::NoMatchingAsset,
                _ => DeployErrorKind::Transport,
            },
            DeployError::Auth { .. } => DeployErrorKind::AuthFailed,
            DeployError::Download { .. } => DeployErrorKind::DownloadFailed,
            DeployError::Upload { source } => match source {
                PlatformError::EnvironmentNotFound { .. } => DeployErrorKind::EnvironmentNotFound,
                PlatformError::Upload { .. } => DeployErrorKind::UploadRejected,
                _ => DeployErrorKind::Transport,
            },
        }
    }
}
