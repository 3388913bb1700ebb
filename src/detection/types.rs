use serde::Serialize;
use std::{fmt::Display, path::PathBuf};

use crate::framework::FrameworkId;

/// A single piece of evidence that contributed to a detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum MatchedSignal {
    ConfigFile(String),
    Dependency(String),
    StaticMarker(PathBuf),
    /// Framework chosen explicitly through config or CLI
    Override,
}

impl Display for MatchedSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigFile(file) => write!(f, "found {file}"),
            Self::Dependency(name) => write!(f, "depends on {name}"),
            Self::StaticMarker(path) => write!(f, "found {}", path.display()),
            Self::Override => f.write_str("framework set explicitly"),
        }
    }
}

/// Outcome of classifying a project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    /// Detected framework
    pub framework: FrameworkId,
    /// Summed signal weights, higher is stronger
    pub score: u32,
    /// Signals that contributed to the score
    pub signals: Vec<MatchedSignal>,
    /// Output directory fixed during detection (static sites only),
    /// relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// `name` field from the manifest, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

/// Score accumulated by one registry variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantScore {
    pub framework: FrameworkId,
    pub score: u32,
    pub signals: Vec<MatchedSignal>,
}
