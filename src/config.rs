//! Configuration loading and parsing for `edgeship.toml` files.
//!
//! Every field is optional. Values given on the command line override the
//! file.
use chrono::NaiveDate;
use log::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path},
};

use crate::{
    Result, error::EdgeshipError, framework::FrameworkId,
    package_manager::PackageManager,
};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "edgeship.toml";

/// Runtime compatibility date used when none is configured.
pub const DEFAULT_COMPATIBILITY_DATE: &str = "2024-09-23";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Root configuration structure for `edgeship.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Worker name. Defaults to the manifest name, then the directory name.
    pub name: Option<String>,
    /// Sub-project to deploy, relative to the project root. Required to
    /// deploy from a monorepo root.
    pub app_dir: Option<String>,
    /// Skip detection and treat the project as this framework.
    pub framework: Option<FrameworkId>,
    /// Package manager to use instead of the lock file based choice.
    pub package_manager: Option<PackageManager>,
    /// Build command run through the shell instead of the framework default.
    pub build_command: Option<String>,
    /// Build output directory relative to the project.
    pub output_dir: Option<String>,
    /// Runtime compatibility date (YYYY-MM-DD).
    pub compatibility_date: String,
    /// Skip dependency installation (default: false)
    pub skip_install: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: None,
            app_dir: None,
            framework: None,
            package_manager: None,
            build_command: None,
            output_dir: None,
            compatibility_date: DEFAULT_COMPATIBILITY_DATE.into(),
            skip_install: false,
        }
    }
}

impl Config {
    /// Parse and validate a config document.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if NaiveDate::parse_from_str(&self.compatibility_date, DATE_FORMAT)
            .is_err()
        {
            return Err(EdgeshipError::invalid_config(format!(
                "compatibility_date must be YYYY-MM-DD, got {:?}",
                self.compatibility_date
            )));
        }

        if let Some(dir) = &self.app_dir {
            let escapes = Path::new(dir).components().any(|c| {
                matches!(
                    c,
                    Component::ParentDir
                        | Component::RootDir
                        | Component::Prefix(_)
                )
            });
            if escapes {
                return Err(EdgeshipError::invalid_config(format!(
                    "app_dir must be a path inside the project, got {dir:?}"
                )));
            }
        }

        if matches!(&self.build_command, Some(cmd) if cmd.trim().is_empty()) {
            return Err(EdgeshipError::invalid_config(
                "build_command must not be empty",
            ));
        }

        Ok(())
    }
}

/// Load `edgeship.toml` from `root`, falling back to defaults when the file
/// does not exist.
pub fn load_config(root: &Path) -> Result<Config> {
    let path = root.join(DEFAULT_CONFIG_FILE);

    if !path.is_file() {
        debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
        return Ok(Config::default());
    }

    info!("loading config from {}", path.display());
    let content = fs::read_to_string(&path)?;
    Config::parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ProjectFixture;

    #[test]
    fn loads_defaults() {
        let config = Config::default();
        assert_eq!(config.compatibility_date, DEFAULT_COMPATIBILITY_DATE);
        assert!(config.framework.is_none());
        assert!(!config.skip_install);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let project = ProjectFixture::new();
        assert_eq!(load_config(project.path()).unwrap(), Config::default());
    }

    #[test]
    fn parses_all_fields() {
        let project = ProjectFixture::new().file(
            DEFAULT_CONFIG_FILE,
            r#"
name = "shop"
app_dir = "examples/blog"
framework = "react-router"
package_manager = "pnpm"
build_command = "pnpm run build:cf"
output_dir = "build/client"
compatibility_date = "2025-01-01"
skip_install = true
"#,
        );

        let config = load_config(project.path()).unwrap();

        assert_eq!(config.name.as_deref(), Some("shop"));
        assert_eq!(config.app_dir.as_deref(), Some("examples/blog"));
        assert_eq!(config.framework, Some(FrameworkId::ReactRouter));
        assert_eq!(config.package_manager, Some(PackageManager::Pnpm));
        assert_eq!(config.output_dir.as_deref(), Some("build/client"));
        assert_eq!(config.compatibility_date, "2025-01-01");
        assert!(config.skip_install);
    }

    #[test]
    fn unknown_framework_is_rejected() {
        let err = Config::parse("framework = \"gatsby\"").unwrap_err();
        assert!(matches!(err, EdgeshipError::TomlParseError(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for content in [
            "compatibility_date = \"yesterday\"",
            "compatibility_date = \"2024-13-45\"",
            "compatibility_date = \"2023-02-29\"",
            "app_dir = \"../elsewhere\"",
            "app_dir = \"/abs\"",
            "build_command = \"  \"",
        ] {
            let err = Config::parse(content).unwrap_err();
            assert!(
                matches!(err, EdgeshipError::InvalidConfig(_)),
                "{content}"
            );
        }
    }
}
