//! Scratch directory for isolated deployments.
//!
//! The directory is owned by the value and removed when it is dropped, so
//! every exit path of the deploy step cleans up after itself.
use log::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::{
    Result,
    deploy::manifest::PLATFORM_CONFIG_FILES,
    strategy::DeploymentStrategy,
};

const SCRATCH_PREFIX: &str = "edgeship-deploy-";

pub struct IsolatedWorkspace {
    dir: TempDir,
}

impl IsolatedWorkspace {
    /// Create a fresh directory holding a copy of the strategy's output,
    /// minus excluded files and any platform config the build emitted.
    pub fn create(strategy: &DeploymentStrategy) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;

        debug!(
            "copying {} into scratch directory {}",
            strategy.output_dir.display(),
            dir.path().display()
        );

        let excluded: Vec<PathBuf> = strategy
            .excluded_files
            .iter()
            .cloned()
            .chain(PLATFORM_CONFIG_FILES.iter().map(PathBuf::from))
            .collect();

        copy_tree(&strategy.output_dir, dir.path(), &excluded)?;

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Copy `src` into `dest`, skipping any entry whose path relative to `src`
/// is in `excluded` (directories are skipped with their contents).
fn copy_tree(src: &Path, dest: &Path, excluded: &[PathBuf]) -> Result<()> {
    let walker = WalkDir::new(src).min_depth(1).into_iter().filter_entry(|e| {
        e.path()
            .strip_prefix(src)
            .map(|rel| !excluded.iter().any(|x| x == rel))
            .unwrap_or(true)
    });

    for entry in walker {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}
