// ABOUTME: Error types for release lookup and artifact download.
// ABOUTME: Covers missing releases, asset selection, and the redirect protocol.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// The tag does not resolve to a release.
    #[error("no release found for tag {tag}")]
    ReleaseNotFound { tag: String },

    /// No asset name contains the release tag.
    #[error("no release asset matches tag {tag}")]
    NoMatchingAsset { tag: String },

    /// The asset endpoint did not answer with a signed download location.
    #[error("asset request returned no download redirect (status {status})")]
    NoRedirect { status: u16 },

    /// The signed download URL could not be parsed.
    #[error("invalid download location: {0}")]
    InvalidLocation(#[from] url::ParseError),

    /// The signed URL refused the download.
    #[error("artifact download failed with status {status}")]
    Download { status: u16 },

    /// The downloaded body does not match the declared asset size.
    #[error("artifact size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    /// Commit lookup for the tag failed; callers degrade to an empty SHA.
    #[error("commit lookup failed: {0}")]
    CommitLookup(String),

    /// Any other non-success API response.
    #[error("source API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
}
