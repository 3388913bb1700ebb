//! Package manager selection and dependency installation.
use clap::ValueEnum;
use log::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, path::Path};

use crate::{
    Result,
    runner::{CommandRunner, CommandSpec},
};

/// Lock files in selection priority order.
pub const LOCKFILES: &[(&str, PackageManager)] = &[
    ("bun.lockb", PackageManager::Bun),
    ("bun.lock", PackageManager::Bun),
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("package-lock.json", PackageManager::Npm),
];

#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.program())
    }
}

impl PackageManager {
    /// Pick the package manager owning the first lock file found, npm when
    /// there is none.
    pub fn from_lockfiles(lockfiles: &[String]) -> Self {
        LOCKFILES
            .iter()
            .find(|(file, _)| lockfiles.iter().any(|l| l == file))
            .map(|(_, pm)| *pm)
            .unwrap_or_default()
    }

    pub fn program(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    /// Prefix for running a package script.
    pub fn run_prefix(&self) -> &'static str {
        match self {
            Self::Npm => "npm run",
            Self::Pnpm => "pnpm run",
            Self::Yarn => "yarn",
            Self::Bun => "bun run",
        }
    }

    /// Prefix for executing a binary from an installed package.
    pub fn exec_prefix(&self) -> &'static str {
        match self {
            Self::Npm => "npx",
            Self::Pnpm => "pnpm exec",
            Self::Yarn => "yarn",
            Self::Bun => "bunx",
        }
    }

    /// Fill `{run}` and `{exec}` placeholders in a registry command template.
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{run}", self.run_prefix())
            .replace("{exec}", self.exec_prefix())
    }

    /// Install commands to try in order: the lockfile-respecting variant
    /// first, a plain install as fallback.
    pub fn install_commands(
        &self,
        has_lockfile: bool,
    ) -> Vec<Vec<&'static str>> {
        let plain = vec!["install"];

        if !has_lockfile {
            return vec![plain];
        }

        let frozen = match self {
            Self::Npm => vec!["ci"],
            Self::Pnpm | Self::Yarn | Self::Bun => {
                vec!["install", "--frozen-lockfile"]
            }
        };

        vec![frozen, plain]
    }

    /// Arguments adding `package` as a development dependency.
    pub fn add_dev_args(&self, package: &str) -> Vec<String> {
        let base: &[&str] = match self {
            Self::Npm => &["install", "--save-dev"],
            Self::Pnpm | Self::Yarn => &["add", "-D"],
            Self::Bun => &["add", "-d"],
        };

        base.iter()
            .map(|s| s.to_string())
            .chain(std::iter::once(package.to_string()))
            .collect()
    }
}

/// Install project dependencies, falling back to a plain install when the
/// lockfile-respecting command fails.
pub async fn install(
    runner: &dyn CommandRunner,
    pm: PackageManager,
    root: &Path,
    has_lockfile: bool,
) -> Result<()> {
    let attempts = pm.install_commands(has_lockfile);
    let last = attempts.len() - 1;

    for (i, args) in attempts.into_iter().enumerate() {
        let spec = CommandSpec::new(pm.program(), root).args(args);

        match runner.run(&spec).await {
            Ok(()) => return Ok(()),
            Err(err) if i < last => {
                warn!("`{}` failed ({err}), retrying", spec.display());
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}
