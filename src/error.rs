//! Custom error types for edgeship with distinct exit codes per failure kind.

use std::path::PathBuf;

use thiserror::Error;

use crate::framework::FrameworkId;

/// Exit code for any failure without a more specific code.
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_NO_FRAMEWORK: i32 = 2;
pub const EXIT_MONOREPO_AMBIGUOUS: i32 = 3;
pub const EXIT_MANIFEST_MALFORMED: i32 = 4;
pub const EXIT_ARTIFACT_INCOMPLETE: i32 = 5;
pub const EXIT_OUTPUT_NOT_FOUND: i32 = 6;
pub const EXIT_COMMAND_FAILED: i32 = 7;
pub const EXIT_INVALID_INPUT: i32 = 8;

/// Main error type for edgeship operations.
#[derive(Error, Debug)]
pub enum EdgeshipError {
    // Input errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Project directory not found: {}", .0.display())]
    ProjectNotFound(PathBuf),

    // Detection errors
    #[error("Failed to parse manifest {}: {message}", path.display())]
    ManifestMalformed { path: PathBuf, message: String },

    #[error(
        "{} is a monorepo root ({}): run edgeship from one of its sub-projects instead",
        root.display(),
        markers.join(", ")
    )]
    MonorepoAmbiguous {
        root: PathBuf,
        markers: Vec<String>,
        candidates: Vec<PathBuf>,
    },

    #[error(
        "No supported framework detected in {}. Supported frameworks: {supported}",
        root.display()
    )]
    NoFrameworkDetected { root: PathBuf, supported: String },

    // Build output errors
    #[error(
        "Build for {framework} finished but did not produce {}: the adapter output is incomplete",
        expected.display()
    )]
    BuildArtifactIncomplete {
        framework: FrameworkId,
        expected: PathBuf,
    },

    #[error(
        "No build output found for {framework}, looked in: {}",
        searched.join(", ")
    )]
    OutputDirNotFound {
        framework: FrameworkId,
        searched: Vec<String>,
    },

    // External collaborator errors
    #[error("Command `{command}` failed{}", exit_suffix(*code))]
    CommandFailed { command: String, code: Option<i32> },

    // Parsing and serialization errors - automatic conversions via #[from]
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to walk build output: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

fn exit_suffix(code: Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {code}"),
        None => " (terminated by signal)".to_string(),
    }
}

/// Result type alias using EdgeshipError
pub type Result<T> = std::result::Result<T, EdgeshipError>;

impl EdgeshipError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a manifest parse error for the given file
    pub fn manifest_malformed(
        path: impl Into<PathBuf>,
        msg: impl Into<String>,
    ) -> Self {
        Self::ManifestMalformed {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a failed external command error
    pub fn command_failed(
        command: impl Into<String>,
        code: Option<i32>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            code,
        }
    }

    /// Process exit code for this error. Scripts rely on these to tell
    /// "nothing to deploy here" apart from "deploy a sub-project instead".
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoFrameworkDetected { .. } => EXIT_NO_FRAMEWORK,
            Self::MonorepoAmbiguous { .. } => EXIT_MONOREPO_AMBIGUOUS,
            Self::ManifestMalformed { .. } => EXIT_MANIFEST_MALFORMED,
            Self::BuildArtifactIncomplete { .. } => EXIT_ARTIFACT_INCOMPLETE,
            Self::OutputDirNotFound { .. } => EXIT_OUTPUT_NOT_FOUND,
            Self::CommandFailed { .. } => EXIT_COMMAND_FAILED,
            Self::InvalidConfig(_)
            | Self::ProjectNotFound(_)
            | Self::TomlParseError(_) => EXIT_INVALID_INPUT,
            _ => EXIT_FAILURE,
        }
    }

    /// Follow-up guidance shown beneath the error message, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MonorepoAmbiguous { candidates, .. }
                if !candidates.is_empty() =>
            {
                let lines = candidates
                    .iter()
                    .map(|c| {
                        format!("  edgeship --path {} deploy", c.display())
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                Some(format!("candidate sub-projects:\n{lines}"))
            }
            Self::MonorepoAmbiguous { .. } => Some(
                "set `app_dir` in edgeship.toml or pass --path to a sub-project"
                    .to_string(),
            ),
            Self::NoFrameworkDetected { .. } => Some(
                "add a package.json with a supported framework, or an index.html for a static site"
                    .to_string(),
            ),
            _ => None,
        }
    }
}

// Generic I/O errors are wrapped in the Other variant
impl From<std::io::Error> for EdgeshipError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}
