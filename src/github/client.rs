// ABOUTME: ReleaseSource trait and the reqwest-backed GitHub client.
// ABOUTME: Downloads follow the two-step signed-redirect protocol manually.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, LOCATION, USER_AGENT};
use reqwest::{Client, StatusCode, redirect};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::error::SourceError;
use super::release::{Release, ReleaseAsset};
use crate::types::ReleaseTag;

const CLIENT_USER_AGENT: &str = concat!("metafora/", env!("CARGO_PKG_VERSION"));

/// Operations against the source-control release API.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Resolve a tag to its release metadata, including the asset listing.
    async fn get_release(&self, tag: &ReleaseTag) -> Result<Release, SourceError>;

    /// Resolve the commit the tag points at. Callers treat failure as
    /// non-fatal and degrade to an empty SHA.
    async fn get_commit_sha(&self, tag: &ReleaseTag) -> Result<String, SourceError>;

    /// Fetch the raw asset bytes into memory.
    async fn download_asset(&self, asset: &ReleaseAsset) -> Result<Bytes, SourceError>;
}

/// GitHub REST client for releases.
pub struct GithubClient {
    api: Client,
    /// Separate client with redirects disabled. The asset endpoint answers
    /// with a signed URL on a host that must not see the API credentials,
    /// so the redirect has to be taken by hand.
    no_redirect: Client,
    base_url: String,
    repository: String,
    token: String,
}

impl GithubClient {
    pub fn new(
        base_url: &str,
        repository: &str,
        token: &str,
    ) -> Result<Self, SourceError> {
        let api = Client::builder().build()?;
        let no_redirect = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            api,
            no_redirect,
            base_url: base_url.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
            token: token.to_string(),
        })
    }

    fn release_url(&self, tag: &ReleaseTag) -> String {
        format!(
            "{}/repos/{}/releases/tags/{}",
            self.base_url, self.repository, tag
        )
    }

    fn commit_url(&self, tag: &ReleaseTag) -> String {
        format!("{}/repos/{}/commits/{}", self.base_url, self.repository, tag)
    }

    fn asset_url(&self, asset: &ReleaseAsset) -> String {
        format!(
            "{}/repos/{}/releases/assets/{}",
            self.base_url, self.repository, asset.id
        )
    }

    fn get(&self, client: &Client, url: &str) -> reqwest::RequestBuilder {
        client
            .get(url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .bearer_auth(&self.token)
    }
}

#[async_trait]
impl ReleaseSource for GithubClient {
    async fn get_release(&self, tag: &ReleaseTag) -> Result<Release, SourceError> {
        let url = self.release_url(tag);
        debug!("GET {url}");

        let response = self
            .get(&self.api, &url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SourceError::ReleaseNotFound {
                tag: tag.to_string(),
            });
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api { status, body });
        }

        Ok(response.json().await?)
    }

    async fn get_commit_sha(&self, tag: &ReleaseTag) -> Result<String, SourceError> {
        let url = self.commit_url(tag);
        debug!("GET {url}");

        let response = self
            .get(&self.api, &url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| SourceError::CommitLookup(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::CommitLookup(format!(
                "status {} for {}",
                response.status(),
                tag
            )));
        }

        #[derive(Deserialize)]
        struct Commit {
            sha: String,
        }

        let commit: Commit = response
            .json()
            .await
            .map_err(|e| SourceError::CommitLookup(e.to_string()))?;
        Ok(commit.sha)
    }

    async fn download_asset(&self, asset: &ReleaseAsset) -> Result<Bytes, SourceError> {
        // Step 1: ask for the asset as a binary stream without following
        // the redirect, and capture the signed location it points at.
        let url = self.asset_url(asset);
        debug!("GET {url} (no redirect)");

        let response = self
            .get(&self.no_redirect, &url)
            .header(ACCEPT, "application/octet-stream")
            .send()
            .await?;

        let status = response.status();
        if !status.is_redirection() {
            return Err(SourceError::NoRedirect {
                status: status.as_u16(),
            });
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(SourceError::NoRedirect {
                status: status.as_u16(),
            })?;
        let signed_url = Url::parse(location)?;

        // Step 2: fetch the signed URL directly. No credentials here; the
        // URL carries its own time-limited authorization.
        debug!("GET {signed_url}");
        let response = self
            .no_redirect
            .get(signed_url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Download {
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await?;
        if body.len() as u64 != asset.size {
            return Err(SourceError::SizeMismatch {
                expected: asset.size,
                actual: body.len() as u64,
            });
        }

        Ok(body)
    }
}
