//! Minimal platform manifest generation.
use regex::Regex;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use crate::{Result, path_helpers::to_slash, strategy::DeploymentStrategy};

pub const MANIFEST_FILE: &str = "wrangler.toml";

/// Platform config files that conflict with a generated manifest.
pub const PLATFORM_CONFIG_FILES: &[&str] =
    &["wrangler.toml", "wrangler.json", "wrangler.jsonc"];

pub const ASSETS_IGNORE_FILE: &str = ".assetsignore";

pub const DEFAULT_WORKER_NAME: &str = "edgeship-app";

const MAX_WORKER_NAME_LEN: usize = 63;

static INVALID_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]+").unwrap());

/// Turn an arbitrary project name into a valid worker name.
pub fn worker_name(raw: &str) -> String {
    let lowered = raw.trim_start_matches('@').to_lowercase();
    let replaced = INVALID_NAME_CHARS.replace_all(&lowered, "-");
    let mut name = replaced.trim_matches('-').to_string();
    name.truncate(MAX_WORKER_NAME_LEN);
    let name = name.trim_end_matches('-').to_string();

    if name.is_empty() {
        DEFAULT_WORKER_NAME.to_string()
    } else {
        name
    }
}

/// Whether `dir` already carries its own platform config.
pub fn existing_platform_config(dir: &Path) -> Option<PathBuf> {
    PLATFORM_CONFIG_FILES
        .iter()
        .map(|f| dir.join(f))
        .find(|p| p.is_file())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetsSection {
    pub directory: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<String>,
}

/// `wrangler.toml` contents edgeship generates for a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WranglerManifest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    pub compatibility_date: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub compatibility_flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<AssetsSection>,
}

impl WranglerManifest {
    /// Build a manifest whose paths are relative to the directory it will be
    /// written to. `base` is the strategy's output directory relative to
    /// that directory (`.` when deploying from a copy of the output).
    pub fn for_strategy(
        strategy: &DeploymentStrategy,
        base: &Path,
        name: &str,
        compatibility_date: &str,
    ) -> Self {
        let main = strategy
            .server_entry
            .as_ref()
            .map(|entry| to_slash(&base.join(entry)));

        let assets = strategy.asset_dir.as_ref().map(|dir| AssetsSection {
            directory: to_slash(&base.join(dir)),
            binding: main
                .as_ref()
                .and(strategy.assets_binding.clone()),
        });

        Self {
            name: name.to_string(),
            main,
            compatibility_date: compatibility_date.to_string(),
            compatibility_flags: strategy.compatibility_flags.clone(),
            assets,
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Write the manifest into `dir`, returning the file path.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_FILE);
        fs::write(&path, self.to_toml()?)?;
        Ok(path)
    }
}

/// Write `.assetsignore` into the asset directory so server code in it is
/// never uploaded as a public asset.
pub fn write_assets_ignore(
    strategy: &DeploymentStrategy,
    deploy_root: &Path,
) -> Result<Option<PathBuf>> {
    let Some(asset_dir) = &strategy.asset_dir else {
        return Ok(None);
    };
    if strategy.asset_ignore.is_empty() {
        return Ok(None);
    }

    let mut lines: Vec<String> =
        strategy.asset_ignore.iter().map(|p| to_slash(p)).collect();
    lines.push(ASSETS_IGNORE_FILE.to_string());

    let path = deploy_root.join(asset_dir).join(ASSETS_IGNORE_FILE);
    fs::write(&path, lines.join("\n") + "\n")?;
    Ok(Some(path))
}
