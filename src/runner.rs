//! External command execution.
//!
//! Every third-party tool edgeship drives (package managers, framework CLIs,
//! the deploy CLI) goes through [`CommandRunner`], so tests can assert on
//! the exact invocations without spawning processes.
use async_trait::async_trait;
use log::*;
use std::path::{Path, PathBuf};

use crate::{Result, error::EdgeshipError};

/// A single external command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            cwd: cwd.to_path_buf(),
            ..Default::default()
        }
    }

    /// Split a whitespace separated command line. Templates from the
    /// framework registry never need quoting.
    pub fn from_line(line: &str, cwd: &Path) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, cwd).args(parts))
    }

    /// Run a user supplied command line through the platform shell.
    pub fn shell(line: &str, cwd: &Path) -> Self {
        if cfg!(windows) {
            Self::new("cmd", cwd).args(["/C", line])
        } else {
            Self::new("sh", cwd).args(["-c", line])
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Command line as a user would type it.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `spec` to completion. A non-zero exit is an error.
    async fn run(&self, spec: &CommandSpec) -> Result<()>;
}

/// Runs commands as child processes with inherited stdio.
#[derive(Debug, Default)]
pub struct ProcessRunner {}

impl ProcessRunner {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<()> {
        info!("running `{}` in {}", spec.display(), spec.cwd.display());

        let status = tokio::process::Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .status()
            .await?;

        if !status.success() {
            return Err(EdgeshipError::command_failed(
                spec.display(),
                status.code(),
            ));
        }

        debug!("`{}` finished successfully", spec.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_line_splits_program_and_args() {
        let spec = CommandSpec::from_line(
            "npx opennextjs-cloudflare build",
            Path::new("/app"),
        )
        .unwrap();

        assert_eq!(spec.program, "npx");
        assert_eq!(spec.args, vec!["opennextjs-cloudflare", "build"]);
        assert_eq!(spec.cwd, PathBuf::from("/app"));
    }

    #[test]
    fn from_line_rejects_empty_input() {
        assert!(CommandSpec::from_line("   ", Path::new(".")).is_none());
    }

    #[test]
    fn display_joins_program_and_args() {
        let spec = CommandSpec::new("npm", Path::new("."))
            .arg("run")
            .arg("build")
            .env("NODE_ENV", "production");

        assert_eq!(spec.display(), "npm run build");
        assert_eq!(
            spec.env,
            vec![("NODE_ENV".to_string(), "production".to_string())]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_runner_reports_exit_code() {
        let runner = ProcessRunner::new();
        let spec = CommandSpec::shell("exit 3", Path::new("."));

        let err = runner.run(&spec).await.unwrap_err();

        match err {
            EdgeshipError::CommandFailed { code, .. } => {
                assert_eq!(code, Some(3))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_runner_succeeds_on_zero_exit() {
        let runner = ProcessRunner::new();
        let spec = CommandSpec::shell("true", Path::new("."));

        runner.run(&spec).await.unwrap();
    }
}
