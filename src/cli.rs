//! Command line arguments.
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::{
    config::Config, framework::FrameworkId, package_manager::PackageManager,
};

/// Global CLI arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(short = 'C', long, default_value = ".", global = true)]
    /// Project directory to operate on.
    pub path: PathBuf,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect, build, and deploy the project.
    Deploy(PipelineArgs),

    /// Detect and build the project, then print the deployment strategy.
    Build(PipelineArgs),

    /// Detect the project's framework without building anything.
    Detect {
        #[arg(long, default_value_t = false)]
        /// Print the detection result as JSON.
        json: bool,
    },

    /// Resolve the deployment strategy of an existing build output.
    Inspect {
        #[arg(long)]
        /// Build output directory, relative to the project.
        output_dir: PathBuf,

        #[arg(long, value_enum, default_value_t = FrameworkId::Unknown)]
        /// Framework that produced the output.
        framework: FrameworkId,

        #[arg(long, default_value_t = false)]
        /// Print the strategy as JSON.
        json: bool,
    },

    /// List supported frameworks.
    Frameworks,
}

/// Options shared by `build` and `deploy`. Each one overrides the matching
/// `edgeship.toml` field.
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct PipelineArgs {
    #[arg(long)]
    /// Worker name.
    pub name: Option<String>,

    #[arg(long, value_enum)]
    /// Skip detection and use this framework.
    pub framework: Option<FrameworkId>,

    #[arg(long, value_enum)]
    /// Package manager to install and build with.
    pub package_manager: Option<PackageManager>,

    #[arg(long)]
    /// Build command, run through the shell.
    pub build_command: Option<String>,

    #[arg(long)]
    /// Build output directory, relative to the project.
    pub output_dir: Option<String>,

    #[arg(long)]
    /// Sub-project to deploy, relative to the project.
    pub app_dir: Option<String>,

    #[arg(long)]
    /// Runtime compatibility date (YYYY-MM-DD).
    pub compatibility_date: Option<String>,

    #[arg(long, default_value_t = false)]
    /// Do not install dependencies.
    pub skip_install: bool,

    #[arg(long, default_value_t = false)]
    /// Do not run the build; use the existing output.
    pub skip_build: bool,

    #[arg(long, default_value_t = false)]
    /// Pass --dry-run to the deploy CLI.
    pub dry_run: bool,

    #[arg(long, default_value_t = false)]
    /// Print the result as JSON.
    pub json: bool,
}

impl PipelineArgs {
    /// Merge these flags over a loaded config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(name) = &self.name {
            config.name = Some(name.clone());
        }
        if let Some(framework) = self.framework {
            config.framework = Some(framework);
        }
        if let Some(pm) = self.package_manager {
            config.package_manager = Some(pm);
        }
        if let Some(cmd) = &self.build_command {
            config.build_command = Some(cmd.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.app_dir {
            config.app_dir = Some(dir.clone());
        }
        if let Some(date) = &self.compatibility_date {
            config.compatibility_date = date.clone();
        }
        config.skip_install |= self.skip_install;
        config
    }
}
