//! Framework specific configure and build steps.
//!
//! Each framework gets at most a couple of external calls to wire in its
//! platform adapter. Dispatch is an exhaustive match on [`FrameworkId`] so a
//! new registry entry cannot be forgotten here.
use log::*;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    Result,
    detection::ProjectProbe,
    framework::FrameworkId,
    package_manager::PackageManager,
    runner::{CommandRunner, CommandSpec},
};

pub const OPENNEXT_ADAPTER: &str = "@opennextjs/cloudflare";
pub const ASTRO_ADAPTER: &str = "@astrojs/cloudflare";
pub const SVELTEKIT_ADAPTER: &str = "@sveltejs/adapter-cloudflare";
pub const SVELTEKIT_AUTO_ADAPTER: &str = "@sveltejs/adapter-auto";
pub const NITRO_PRESET: (&str, &str) = ("NITRO_PRESET", "cloudflare_module");

const SVELTE_CONFIG_FILES: &[&str] =
    &["svelte.config.js", "svelte.config.mjs", "svelte.config.ts"];

/// One step of framework configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureStep {
    Run(CommandSpec),
    /// Replace text in a project file, skipped if `from` is absent
    Patch {
        file: PathBuf,
        from: String,
        to: String,
    },
}

/// Everything needed to turn sources into deployable output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildPlan {
    pub configure: Vec<ConfigureStep>,
    pub build: Option<CommandSpec>,
}

/// Command lines a user would run for this project, rendered for the
/// selected package manager.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FrameworkCommands {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_command: Option<String>,
}

pub fn commands(
    framework: FrameworkId,
    pm: PackageManager,
    build_override: Option<&str>,
) -> FrameworkCommands {
    let variant = framework.variant();

    FrameworkCommands {
        build_command: build_override
            .map(String::from)
            .or_else(|| variant.build_command.map(|t| pm.render(t))),
        dev_command: variant.dev_command.map(|t| pm.render(t)),
    }
}

/// Plan configure and build steps for `framework` in `probe.root`.
///
/// `build_override` is a user supplied command line and runs through the
/// shell; registry templates are rendered for `pm`.
pub fn plan(
    framework: FrameworkId,
    probe: &ProjectProbe,
    pm: PackageManager,
    build_override: Option<&str>,
) -> BuildPlan {
    let root = probe.root.as_path();

    let build = match build_override {
        Some(line) => Some(CommandSpec::shell(line, root)),
        None => framework
            .variant()
            .build_command
            .and_then(|template| {
                CommandSpec::from_line(&pm.render(template), root)
            }),
    }
    .map(|spec| {
        build_env(framework)
            .into_iter()
            .fold(spec, |spec, (k, v)| spec.env(k, v))
    });

    BuildPlan {
        configure: configure_steps(framework, probe, pm),
        build,
    }
}

fn configure_steps(
    framework: FrameworkId,
    probe: &ProjectProbe,
    pm: PackageManager,
) -> Vec<ConfigureStep> {
    let root = probe.root.as_path();
    let add_dev = |package: &str| {
        ConfigureStep::Run(
            CommandSpec::new(pm.program(), root).args(pm.add_dev_args(package)),
        )
    };

    match framework {
        FrameworkId::Nextjs if !probe.has_dependency(OPENNEXT_ADAPTER) => {
            vec![add_dev(OPENNEXT_ADAPTER)]
        }
        FrameworkId::Astro if !probe.has_dependency(ASTRO_ADAPTER) => {
            let line = pm.render("{exec} astro add cloudflare --yes");
            CommandSpec::from_line(&line, root)
                .map(ConfigureStep::Run)
                .into_iter()
                .collect()
        }
        FrameworkId::Sveltekit if !probe.has_dependency(SVELTEKIT_ADAPTER) => {
            let mut steps = vec![add_dev(SVELTEKIT_ADAPTER)];
            if let Some(file) =
                SVELTE_CONFIG_FILES.iter().find(|f| probe.has_config_file(f))
            {
                steps.push(ConfigureStep::Patch {
                    file: PathBuf::from(file),
                    from: SVELTEKIT_AUTO_ADAPTER.to_string(),
                    to: SVELTEKIT_ADAPTER.to_string(),
                });
            }
            steps
        }
        FrameworkId::Nextjs
        | FrameworkId::Astro
        | FrameworkId::Sveltekit
        | FrameworkId::Nuxt
        | FrameworkId::ReactVite
        | FrameworkId::ReactRouter
        | FrameworkId::Remix
        | FrameworkId::Angular
        | FrameworkId::Static
        | FrameworkId::Unknown => vec![],
    }
}

fn build_env(framework: FrameworkId) -> Vec<(&'static str, &'static str)> {
    match framework {
        FrameworkId::Nuxt => vec![NITRO_PRESET],
        FrameworkId::Nextjs
        | FrameworkId::Astro
        | FrameworkId::Sveltekit
        | FrameworkId::ReactVite
        | FrameworkId::ReactRouter
        | FrameworkId::Remix
        | FrameworkId::Angular
        | FrameworkId::Static
        | FrameworkId::Unknown => vec![],
    }
}

/// Execute configure steps in order, stopping at the first failure.
pub async fn configure(
    runner: &dyn CommandRunner,
    root: &Path,
    steps: &[ConfigureStep],
) -> Result<()> {
    for step in steps {
        match step {
            ConfigureStep::Run(spec) => runner.run(spec).await?,
            ConfigureStep::Patch { file, from, to } => {
                apply_patch(&root.join(file), from, to)?
            }
        }
    }
    Ok(())
}

fn apply_patch(path: &Path, from: &str, to: &str) -> Result<()> {
    let content = fs::read_to_string(path)?;

    if !content.contains(from) {
        debug!("{} does not reference {from}, leaving it", path.display());
        return Ok(());
    }

    info!("switching {} from {from} to {to}", path.display());
    fs::write(path, content.replace(from, to))?;
    Ok(())
}
