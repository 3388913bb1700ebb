use serde::Serialize;
use std::{fmt::Display, path::PathBuf};

/// Name of the static asset binding exposed to server code.
pub const ASSETS_BINDING: &str = "ASSETS";

/// Deployment topology of a build output.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentType {
    Static,
    Ssr,
    Hybrid,
    PlatformAdapter,
    Unknown,
}

impl DeploymentType {
    /// Runtime compatibility flags required by the platform.
    pub fn compatibility_flags(&self) -> &'static [&'static str] {
        match self {
            Self::Ssr => &["nodejs_compat"],
            Self::PlatformAdapter => {
                &["nodejs_compat", "global_fetch_strictly_public"]
            }
            Self::Static | Self::Hybrid | Self::Unknown => &[],
        }
    }

    /// Asset binding name, only for topologies that run server code.
    pub fn assets_binding(&self) -> Option<&'static str> {
        match self {
            Self::Ssr | Self::PlatformAdapter => Some(ASSETS_BINDING),
            Self::Static | Self::Hybrid | Self::Unknown => None,
        }
    }
}

impl Display for DeploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::Ssr => f.write_str("ssr"),
            Self::Hybrid => f.write_str("hybrid"),
            Self::PlatformAdapter => f.write_str("platform-adapter"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Concrete serving configuration derived from a build artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentStrategy {
    pub kind: DeploymentType,
    /// Absolute path of the directory that gets deployed
    pub output_dir: PathBuf,
    /// Server entry relative to `output_dir`
    pub server_entry: Option<PathBuf>,
    /// Asset directory relative to `output_dir`
    pub asset_dir: Option<PathBuf>,
    pub compatibility_flags: Vec<String>,
    pub assets_binding: Option<String>,
    /// Deploy from a fresh scratch directory instead of the project root
    pub isolation_required: bool,
    /// Paths relative to `output_dir` left out of the deployed copy
    pub excluded_files: Vec<PathBuf>,
    /// Paths relative to `asset_dir` that must not be served as assets
    pub asset_ignore: Vec<PathBuf>,
    /// Set when the layout was not recognised
    pub warning: Option<String>,
}

impl DeploymentStrategy {
    /// Strategy skeleton with the fixed per-type flags filled in.
    pub fn new(kind: DeploymentType, output_dir: PathBuf) -> Self {
        Self {
            kind,
            output_dir,
            server_entry: None,
            asset_dir: None,
            compatibility_flags: kind
                .compatibility_flags()
                .iter()
                .map(|f| f.to_string())
                .collect(),
            assets_binding: kind.assets_binding().map(String::from),
            isolation_required: false,
            excluded_files: vec![],
            asset_ignore: vec![],
            warning: None,
        }
    }

    pub fn has_server(&self) -> bool {
        self.server_entry.is_some()
    }
}
