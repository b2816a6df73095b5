// ABOUTME: Credential strategy for deployment-platform calls.
// ABOUTME: One variant is selected at configuration time and never re-decided.

mod error;

pub use error::AuthError;

use reqwest::RequestBuilder;

/// Deployment-platform credentials as configured for this run.
///
/// The variant is fixed by `Credentials::from_env` before the pipeline
/// starts; no call site branches on which strategy is in play.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// HTTP basic authentication on every platform call.
    Basic { username: String, password: String },
    /// OAuth2 client credentials; a bearer token is exchanged once per run.
    OAuth {
        client_id: String,
        client_secret: String,
    },
}

/// Ready-to-use outbound authentication, produced by the authenticate stage.
///
/// For the OAuth variant this carries the bearer token acquired for this
/// run; the token lives only as long as the process.
#[derive(Debug, Clone)]
pub enum AuthContext {
    Basic {
        username: String,
        password: String,
    },
    OAuth {
        client_id: String,
        client_secret: String,
        token: String,
    },
}

impl AuthContext {
    /// Attach this run's authentication to an outgoing platform request.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            AuthContext::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            AuthContext::OAuth {
                client_id,
                client_secret,
                token,
            } => request
                .bearer_auth(token)
                .header("x-anypnt-client-id", client_id)
                .header("x-anypnt-client-secret", client_secret),
        }
    }
}
