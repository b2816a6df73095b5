// ABOUTME: Deployment-platform client: token exchange, environments, upload.
// ABOUTME: Operation traits keep the orchestrator independent of the wire.

mod client;
mod environment;
mod error;

pub use client::{AnypointClient, ArtifactOps, AuthOps, EnvironmentOps};
pub use environment::{Environment, resolve_environment};
pub use error::PlatformError;
