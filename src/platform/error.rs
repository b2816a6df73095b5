// ABOUTME: Error types for deployment-platform operations.
// ABOUTME: Covers environment lookup and artifact upload failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    /// No environment in the organization matches the requested name.
    #[error("environment not found: {name}")]
    EnvironmentNotFound { name: String },

    /// The environment listing call was rejected.
    #[error("environment listing failed with status {status}: {body}")]
    EnvironmentList { status: u16, body: String },

    /// The platform rejected the artifact upload.
    #[error("artifact upload failed with status {status}: {body}")]
    Upload { status: u16, body: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
}
