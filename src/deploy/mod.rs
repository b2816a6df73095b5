// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers, Deployment struct, and the outcome record.

mod deployment;
mod error;
mod outcome;
mod state;
mod transitions;

pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind};
pub use outcome::DeploymentOutcome;
pub use state::{Authenticated, Downloaded, Fetched, Initialized, Uploaded};
