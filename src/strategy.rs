//! Deployment strategy resolution: classify a build output into a topology
//! and derive the serving configuration the deploy step needs.
pub mod artifact;
pub mod resolver;
pub mod types;

pub use artifact::{BuildArtifact, locate_output_dir};
pub use resolver::resolve;
pub use types::{DeploymentStrategy, DeploymentType};
