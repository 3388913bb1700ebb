//! Build output inspection.
use log::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    Result,
    error::EdgeshipError,
    framework::FrameworkVariant,
};

/// Server entry locations checked inside an output directory, in order.
pub const SERVER_ENTRY_CANDIDATES: &[&str] = &[
    "_worker.js",
    "_worker.js/index.js",
    "server/index.mjs",
    "server/index.js",
];

/// Root level file marking a deployable static site.
pub const STATIC_INDEX: &str = "index.html";

/// Route manifest that would re-enable a stripped server entry.
pub const ROUTES_MANIFEST: &str = "_routes.json";

/// What the build step left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    pub project_root: PathBuf,
    /// Absolute path of the build output
    pub output_dir: PathBuf,
    /// Server entry relative to `output_dir`
    pub server_entry: Option<PathBuf>,
    pub has_static_index: bool,
}

impl BuildArtifact {
    /// Inspect `output_dir` without modifying it.
    pub fn probe(project_root: &Path, output_dir: &Path) -> Self {
        let server_entry = SERVER_ENTRY_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|candidate| output_dir.join(candidate).is_file());

        let has_static_index = output_dir.join(STATIC_INDEX).is_file();

        debug!(
            "build output {}: server entry {:?}, static index {}",
            output_dir.display(),
            server_entry,
            has_static_index
        );

        Self {
            project_root: project_root.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            server_entry,
            has_static_index,
        }
    }

    pub fn has_server_entry(&self) -> bool {
        self.server_entry.is_some()
    }

    /// Whether `rel` exists inside the output directory.
    pub fn contains(&self, rel: &str) -> bool {
        self.output_dir.join(rel).exists()
    }
}

/// Locate the build output for `variant`.
///
/// An explicit `override_dir` wins and must exist. Otherwise the variant's
/// candidates are tried in order; a `*` segment matches the first
/// subdirectory in sorted order.
pub fn locate_output_dir(
    project_root: &Path,
    variant: &FrameworkVariant,
    override_dir: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        let path = project_root.join(dir);
        if path.is_dir() {
            return Ok(path);
        }
        return Err(EdgeshipError::OutputDirNotFound {
            framework: variant.id,
            searched: vec![dir.display().to_string()],
        });
    }

    for candidate in variant.output_dirs {
        if let Some(path) = expand_candidate(project_root, candidate)? {
            debug!("using output directory {}", path.display());
            return Ok(path);
        }
    }

    Err(EdgeshipError::OutputDirNotFound {
        framework: variant.id,
        searched: variant.output_dirs.iter().map(|d| d.to_string()).collect(),
    })
}

fn expand_candidate(root: &Path, candidate: &str) -> Result<Option<PathBuf>> {
    let mut current = root.to_path_buf();

    for segment in candidate.split('/') {
        if segment == "*" {
            match first_subdirectory(&current)? {
                Some(dir) => current = dir,
                None => return Ok(None),
            }
        } else {
            current.push(segment);
        }
    }

    Ok(current.is_dir().then_some(current))
}

fn first_subdirectory(dir: &Path) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut dirs = vec![];
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();

    Ok(dirs.into_iter().next())
}
