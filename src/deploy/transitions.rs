// ABOUTME: State transition methods for the deployment pipeline.
// ABOUTME: Each method consumes self and returns the next state on success.

use snafu::ResultExt;
use tracing::warn;

use crate::auth::{AuthContext, Credentials};
use crate::github::{ReleaseSource, select_asset};
use crate::platform::{ArtifactOps, AuthOps, EnvironmentOps, resolve_environment};

use super::Deployment;
use super::error::{AuthSnafu, DeployError, DownloadSnafu, FetchSnafu, UploadSnafu};
use super::state::{Authenticated, Downloaded, Fetched, Initialized, Uploaded};

// =============================================================================
// Initialized -> Fetched
// =============================================================================

impl Deployment<Initialized> {
    /// Resolve the release for the configured tag and select its asset.
    ///
    /// The commit SHA is looked up here too, but its failure only degrades
    /// the outcome record: deploying an artifact does not depend on it.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Fetch` when the release does not exist or no
    /// asset name contains the tag.
    #[must_use = "deployment state must be used"]
    pub async fn fetch_release<S: ReleaseSource>(
        self,
        source: &S,
    ) -> Result<Deployment<Fetched>, DeployError> {
        let release = source
            .get_release(&self.config.release_tag)
            .await
            .context(FetchSnafu)?;

        let asset = select_asset(&release.assets, &self.config.release_tag)
            .context(FetchSnafu)?
            .clone();

        let commit_sha = match source.get_commit_sha(&self.config.release_tag).await {
            Ok(sha) => Some(sha),
            Err(e) => {
                warn!(
                    "commit lookup for {} failed, outcome will carry no commit: {e}",
                    self.config.release_tag
                );
                None
            }
        };

        Ok(Deployment {
            config: self.config,
            commit_sha,
            state: Fetched { asset },
        })
    }
}

// =============================================================================
// Fetched -> Authenticated
// =============================================================================

impl Deployment<Fetched> {
    /// Turn the configured credentials into ready outbound authentication.
    ///
    /// For the OAuth variant this performs the one token exchange of the
    /// run; for basic credentials no network call is needed.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Auth` when the token exchange is rejected.
    #[must_use = "deployment state must be used"]
    pub async fn authenticate<P: AuthOps>(
        self,
        platform: &P,
        credentials: &Credentials,
    ) -> Result<Deployment<Authenticated>, DeployError> {
        let auth = match credentials {
            Credentials::Basic { username, password } => AuthContext::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            Credentials::OAuth {
                client_id,
                client_secret,
            } => {
                let token = platform
                    .acquire_token(client_id, client_secret)
                    .await
                    .context(AuthSnafu)?;
                AuthContext::OAuth {
                    client_id: client_id.clone(),
                    client_secret: client_secret.clone(),
                    token,
                }
            }
        };

        let Fetched { asset } = self.state;
        Ok(Deployment {
            config: self.config,
            commit_sha: self.commit_sha,
            state: Authenticated { asset, auth },
        })
    }
}

// =============================================================================
// Authenticated -> Downloaded
// =============================================================================

impl Deployment<Authenticated> {
    /// Download the selected asset into memory.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Download` when the redirect protocol or the
    /// transfer fails.
    #[must_use = "deployment state must be used"]
    pub async fn download<S: ReleaseSource>(
        self,
        source: &S,
    ) -> Result<Deployment<Downloaded>, DeployError> {
        let artifact = source
            .download_asset(&self.state.asset)
            .await
            .context(DownloadSnafu)?;

        let Authenticated { asset, auth } = self.state;
        Ok(Deployment {
            config: self.config,
            commit_sha: self.commit_sha,
            state: Downloaded {
                asset,
                auth,
                artifact,
            },
        })
    }
}

// =============================================================================
// Downloaded -> Uploaded
// =============================================================================

impl Deployment<Downloaded> {
    /// Resolve the target environment and upload the artifact.
    ///
    /// The artifact buffer moves into the upload call and is gone after
    /// this transition, success or not.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Upload` when the environment cannot be
    /// resolved or the platform rejects the upload.
    #[must_use = "deployment state must be used"]
    pub async fn upload<P: EnvironmentOps + ArtifactOps>(
        self,
        platform: &P,
    ) -> Result<Deployment<Uploaded>, DeployError> {
        let Deployment {
            config,
            commit_sha,
            state: Downloaded {
                asset,
                auth,
                artifact,
            },
        } = self;

        let environments = platform
            .list_environments(&config.org_id, &auth)
            .await
            .context(UploadSnafu)?;

        let environment =
            resolve_environment(environments, &config.environment).context(UploadSnafu)?;

        platform
            .upload_artifact(&environment, &config.app_name, artifact, &asset.name, &auth)
            .await
            .context(UploadSnafu)?;

        Ok(Deployment {
            config,
            commit_sha,
            state: Uploaded { environment },
        })
    }
}
