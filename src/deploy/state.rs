// ABOUTME: Deployment state types for the type state pattern.
// ABOUTME: Each state carries exactly the data the next transition needs.

use bytes::Bytes;

use crate::auth::AuthContext;
use crate::github::ReleaseAsset;
use crate::platform::Environment;

/// Initial state: request validated, nothing fetched yet.
/// Available actions: `fetch_release()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Release resolved: the deployable asset is selected.
/// Available actions: `authenticate()`
#[derive(Debug, Clone)]
pub struct Fetched {
    pub(crate) asset: ReleaseAsset,
}

/// Credentials ready: the platform will accept our calls.
/// Available actions: `download()`
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub(crate) asset: ReleaseAsset,
    pub(crate) auth: AuthContext,
}

/// Artifact in memory: the buffer is owned here and consumed by upload.
/// Available actions: `upload()`
#[derive(Debug)]
pub struct Downloaded {
    pub(crate) asset: ReleaseAsset,
    pub(crate) auth: AuthContext,
    pub(crate) artifact: Bytes,
}

/// Terminal state: the artifact landed in the resolved environment.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Uploaded {
    pub(crate) environment: Environment,
}
