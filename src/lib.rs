pub mod builder;
pub mod cli;
pub mod command;
pub mod config;
pub mod deploy;
pub mod detection;
pub mod error;
pub mod framework;
pub mod orchestrator;
pub mod package_manager;
mod path_helpers;
pub mod runner;
pub mod strategy;

pub use error::{EdgeshipError, Result};

#[cfg(test)]
pub mod test_helpers;
