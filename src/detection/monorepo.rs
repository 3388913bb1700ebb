use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::Result;

/// Directories conventionally holding sub-projects in a monorepo.
pub const SUBPROJECT_DIRS: &[&str] = &["examples", "packages", "apps"];

/// List candidate sub-project directories relative to `root`, sorted within
/// each parent. Hidden entries are skipped.
pub fn discover_subprojects(root: &Path) -> Result<Vec<PathBuf>> {
    let mut candidates = vec![];

    for parent in SUBPROJECT_DIRS {
        let dir = root.join(parent);
        if !dir.is_dir() {
            continue;
        }

        let mut children = vec![];
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !entry.file_type()?.is_dir() {
                continue;
            }
            children.push(Path::new(parent).join(name));
        }

        children.sort();
        candidates.extend(children);
    }

    Ok(candidates)
}
