//! Common test helper functions shared across test modules.
//!
//! Provides a throwaway project directory that tests can populate with
//! manifests, config files, and build output.
use serde_json::json;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// Temporary project directory removed when dropped.
///
/// # Example
/// ```ignore
/// let project = ProjectFixture::new()
///     .package_json(&["astro"], &[])
///     .file("astro.config.mjs", "export default {}");
/// ```
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Writes a `package.json` named `fixture-app` with the given
    /// dependency names.
    pub fn package_json(self, deps: &[&str], dev_deps: &[&str]) -> Self {
        let to_map = |names: &[&str]| {
            names
                .iter()
                .map(|n| (n.to_string(), json!("^1.0.0")))
                .collect::<serde_json::Map<_, _>>()
        };

        let manifest = json!({
            "name": "fixture-app",
            "version": "1.0.0",
            "scripts": { "build": "echo build" },
            "dependencies": to_map(deps),
            "devDependencies": to_map(dev_deps),
        });

        self.file(
            "package.json",
            &serde_json::to_string_pretty(&manifest).unwrap(),
        )
    }

    /// Writes a file, creating parent directories as needed.
    pub fn file(self, rel: &str, content: &str) -> Self {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        self
    }

    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.join(rel)).unwrap();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_json_lists_dependencies() {
        let project = ProjectFixture::new().package_json(&["next"], &["vite"]);
        let content = fs::read_to_string(project.join("package.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["name"], "fixture-app");
        assert!(value["dependencies"]["next"].is_string());
        assert!(value["devDependencies"]["vite"].is_string());
    }

    #[test]
    fn test_file_creates_parent_directories() {
        let project = ProjectFixture::new().file("a/b/c.txt", "hi");
        assert!(project.join("a/b/c.txt").is_file());
    }
}
