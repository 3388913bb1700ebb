//! Read-only snapshot of the signals a project directory exposes.
use log::*;
use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
};

use crate::{
    Result,
    error::EdgeshipError,
    framework::list_variants,
    package_manager::LOCKFILES,
};

pub const MANIFEST_FILE: &str = "package.json";

/// Files whose presence marks a monorepo root.
pub const MONOREPO_MARKER_FILES: &[&str] =
    &["pnpm-workspace.yaml", "turbo.json", "lerna.json"];

/// Marker reported when `package.json` declares workspaces.
pub const WORKSPACES_FIELD_MARKER: &str = "package.json#workspaces";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// The subset of `package.json` edgeship reads.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: Option<String>,
    pub dependencies: BTreeMap<String, serde_json::Value>,
    pub dev_dependencies: BTreeMap<String, serde_json::Value>,
    pub workspaces: Option<serde_json::Value>,
}

impl PackageManifest {
    /// Parse manifest text. A leading byte order mark is ignored, as
    /// package managers accept it.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);
        serde_json::from_str(content).map_err(|e| {
            EdgeshipError::manifest_malformed(path, e.to_string())
        })
    }

    fn declares_workspaces(&self) -> bool {
        match &self.workspaces {
            Some(serde_json::Value::Array(list)) => !list.is_empty(),
            Some(serde_json::Value::Object(obj)) => !obj.is_empty(),
            _ => false,
        }
    }
}

/// Everything detection needs to know about a project, gathered once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectProbe {
    pub root: PathBuf,
    pub has_manifest: bool,
    pub project_name: Option<String>,
    /// Names from both `dependencies` and `devDependencies`
    pub dependencies: BTreeSet<String>,
    /// Registry config files that exist, as relative paths
    pub config_files: BTreeSet<String>,
    pub monorepo_markers: Vec<String>,
    pub lockfiles: Vec<String>,
}

impl ProjectProbe {
    /// Collect signals from `root`. Never writes to the project directory.
    pub fn collect(root: &Path) -> Result<Self> {
        let manifest_path = root.join(MANIFEST_FILE);

        let manifest = if manifest_path.is_file() {
            let content = fs::read_to_string(&manifest_path)?;
            Some(PackageManifest::parse(&manifest_path, &content)?)
        } else {
            debug!("no {} in {}", MANIFEST_FILE, root.display());
            None
        };

        let mut dependencies = BTreeSet::new();
        let mut project_name = None;
        let mut monorepo_markers = vec![];

        if let Some(manifest) = &manifest {
            dependencies.extend(manifest.dependencies.keys().cloned());
            dependencies.extend(manifest.dev_dependencies.keys().cloned());
            project_name = manifest.name.clone();

            if manifest.declares_workspaces() {
                monorepo_markers.push(WORKSPACES_FIELD_MARKER.to_string());
            }
        }

        for marker in MONOREPO_MARKER_FILES {
            if root.join(marker).is_file() {
                monorepo_markers.push(marker.to_string());
            }
        }

        let config_files = list_variants()
            .iter()
            .flat_map(|v| v.config_files.iter())
            .filter(|file| root.join(file).exists())
            .map(|file| file.to_string())
            .collect();

        let lockfiles = LOCKFILES
            .iter()
            .filter(|(file, _)| root.join(file).is_file())
            .map(|(file, _)| file.to_string())
            .collect();

        Ok(Self {
            root: root.to_path_buf(),
            has_manifest: manifest.is_some(),
            project_name,
            dependencies,
            config_files,
            monorepo_markers,
            lockfiles,
        })
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains(name)
    }

    pub fn has_config_file(&self, file: &str) -> bool {
        self.config_files.contains(file)
    }

    pub fn is_monorepo_root(&self) -> bool {
        !self.monorepo_markers.is_empty()
    }
}
