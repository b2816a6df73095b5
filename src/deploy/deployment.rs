// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::config::Config;
use crate::github::ReleaseAsset;
use crate::platform::Environment;

use super::state::{Downloaded, Fetched, Initialized, Uploaded};

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries state-specific data (the selected
/// asset, the artifact buffer) directly in the state type, so a transition
/// can only run when its inputs provably exist.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) config: Config,
    pub(crate) commit_sha: Option<String>,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    /// Start a deployment for the given request.
    pub fn new(config: Config) -> Self {
        Deployment {
            config,
            commit_sha: None,
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    /// Get the deployment request.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Commit the release tag points at (None when the lookup failed or
    /// has not happened yet).
    pub fn commit_sha(&self) -> Option<&str> {
        self.commit_sha.as_deref()
    }
}

impl Deployment<Fetched> {
    /// Get the selected release asset.
    pub fn asset(&self) -> &ReleaseAsset {
        &self.state.asset
    }
}

impl Deployment<Downloaded> {
    /// Byte count of the in-memory artifact.
    pub fn artifact_len(&self) -> usize {
        self.state.artifact.len()
    }
}

impl Deployment<Uploaded> {
    /// The environment the artifact was uploaded to.
    pub fn environment(&self) -> &Environment {
        &self.state.environment
    }

    /// Consume the deployment and return the resolved environment.
    pub fn finish(self) -> Environment {
        self.state.environment
    }
}
