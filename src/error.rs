// ABOUTME: Application-wide error types for metafora.
// ABOUTME: Uses thiserror for ergonomic error handling.

use thiserror::Error;

use crate::deploy::DeployError;
use crate::types::{AppNameError, ReleaseTagError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error(
        "no deployment credentials found: set CLOUDHUB_USER/CLOUDHUB_PASSWORD \
         or ANYPOINT_CLIENT_ID/ANYPOINT_CLIENT_SECRET"
    )]
    MissingCredentials,

    #[error("invalid release tag: {0}")]
    ReleaseTag(#[from] ReleaseTagError),

    #[error("invalid application name: {0}")]
    AppName(#[from] AppNameError),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}

pub type Result<T> = std::result::Result<T, Error>;
