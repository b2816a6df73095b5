// ABOUTME: Operation traits for the deployment platform and the Anypoint client.
// ABOUTME: Token exchange, environment listing, and multipart artifact upload.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::environment::Environment;
use super::error::PlatformError;
use crate::auth::{AuthContext, AuthError};
use crate::types::{AppName, OrganizationId};

/// OAuth2 client-credentials token exchange.
#[async_trait]
pub trait AuthOps: Send + Sync {
    /// Exchange client credentials for a bearer token. Called at most once
    /// per run, and only for the OAuth credential variant.
    async fn acquire_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String, AuthError>;
}

/// Environment listing for an organization.
#[async_trait]
pub trait EnvironmentOps: Send + Sync {
    async fn list_environments(
        &self,
        org_id: &OrganizationId,
        auth: &AuthContext,
    ) -> Result<Vec<Environment>, PlatformError>;
}

/// Artifact upload into an application.
#[async_trait]
pub trait ArtifactOps: Send + Sync {
    /// Push the artifact to the application as a single multipart request.
    /// A rejected upload must surface as an error; it is never just logged.
    async fn upload_artifact(
        &self,
        environment: &Environment,
        app_name: &AppName,
        artifact: Bytes,
        artifact_name: &str,
        auth: &AuthContext,
    ) -> Result<(), PlatformError>;
}

/// Client for the Anypoint platform APIs.
pub struct AnypointClient {
    http: Client,
    base_url: String,
}

impl AnypointClient {
    pub fn new(base_url: &str) -> Result<Self, PlatformError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AuthOps for AnypointClient {
    async fn acquire_token(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String, AuthError> {
        let url = format!("{}/accounts/api/v2/oauth2/token", self.base_url);
        debug!("POST {url}");

        let response = self
            .http
            .post(&url)
            .json(&json!({
                "grant_type": "client_credentials",
                "client_id": client_id,
                "client_secret": client_secret,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchange { status, body });
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: Option<String>,
        }

        let token: TokenResponse = response.json().await?;
        token.access_token.ok_or(AuthError::MissingToken)
    }
}

#[async_trait]
impl EnvironmentOps for AnypointClient {
    async fn list_environments(
        &self,
        org_id: &OrganizationId,
        auth: &AuthContext,
    ) -> Result<Vec<Environment>, PlatformError> {
        let url = format!(
            "{}/accounts/api/organizations/{}/environments",
            self.base_url, org_id
        );
        debug!("GET {url}");

        let response = auth.apply(self.http.get(&url)).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::EnvironmentList { status, body });
        }

        #[derive(Deserialize)]
        struct EnvironmentList {
            data: Vec<Environment>,
        }

        let listing: EnvironmentList = response.json().await?;
        Ok(listing.data)
    }
}

#[async_trait]
impl ArtifactOps for AnypointClient {
    async fn upload_artifact(
        &self,
        environment: &Environment,
        app_name: &AppName,
        artifact: Bytes,
        artifact_name: &str,
        auth: &AuthContext,
    ) -> Result<(), PlatformError> {
        let url = format!(
            "{}/cloudhub/api/v2/applications/{}/files",
            self.base_url,
            urlencoding::encode(app_name.as_str())
        );
        debug!("POST {url} ({} bytes)", artifact.len());

        // The artifact is held fully in memory, so the part has a known
        // length and the request goes out non-chunked.
        let part = Part::stream(artifact).file_name(artifact_name.to_string());
        let form = Form::new().part("file", part);

        let request = self
            .http
            .post(&url)
            .header("X-ANYPNT-ENV-ID", environment.id.as_str())
            .multipart(form);

        let response = auth.apply(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Upload { status, body });
        }

        Ok(())
    }
}
