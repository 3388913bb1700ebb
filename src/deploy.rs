//! Deployment to the edge platform through its CLI.
//!
//! Strategies that need isolation are deployed from a scratch copy of the
//! build output; everything else deploys from the project root, with a
//! generated `wrangler.toml` when the project does not ship its own.
pub mod deployer;
pub mod manifest;
pub mod workspace;

pub use deployer::{DeployReport, DeployRequest, Deployer};
pub use manifest::worker_name;
