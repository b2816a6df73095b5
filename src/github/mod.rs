// ABOUTME: Source-control release client: metadata, commit lookup, download.
// ABOUTME: Exposes the ReleaseSource trait and the reqwest-backed client.

mod client;
mod error;
mod release;

pub use client::{GithubClient, ReleaseSource};
pub use error::SourceError;
pub use release::{Release, ReleaseAsset, select_asset};
