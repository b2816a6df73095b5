// ABOUTME: Error types for credential handling and token acquisition.
// ABOUTME: Token exchange failure is fatal to the run, with no fallback.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint rejected the client-credentials exchange.
    #[error("token exchange failed with status {status}: {body}")]
    TokenExchange { status: u16, body: String },

    /// The token response did not carry an access token.
    #[error("token response missing access token")]
    MissingToken,

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
}
