//! Hands a resolved strategy to the platform deploy CLI.
use log::*;
use serde::Serialize;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    Result,
    deploy::{
        manifest::{
            MANIFEST_FILE, WranglerManifest, existing_platform_config,
            write_assets_ignore,
        },
        workspace::IsolatedWorkspace,
    },
    path_helpers::{relative_to, to_slash},
    runner::{CommandRunner, CommandSpec},
    strategy::{DeploymentStrategy, DeploymentType},
};

const DEPLOY_PROGRAM: &str = "npx";

/// `--yes` keeps npx from prompting when wrangler is not installed locally,
/// which is always the case inside a scratch directory.
const DEPLOY_ARGS: &[&str] = &["--yes", "wrangler", "deploy"];

/// Inputs for a single deployment.
#[derive(Debug, Clone)]
pub struct DeployRequest<'a> {
    pub strategy: &'a DeploymentStrategy,
    pub project_root: &'a Path,
    /// Sanitised worker name
    pub name: String,
    pub compatibility_date: String,
    pub dry_run: bool,
}

/// What was handed to the deploy CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    pub name: String,
    pub kind: DeploymentType,
    pub isolated: bool,
    /// Manifest written into the project, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
    pub command: String,
    pub dry_run: bool,
}

pub struct Deployer {
    runner: Arc<dyn CommandRunner>,
}

impl Deployer {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    pub async fn deploy(
        &self,
        request: &DeployRequest<'_>,
    ) -> Result<DeployReport> {
        if request.strategy.isolation_required {
            self.deploy_isolated(request).await
        } else {
            self.deploy_in_place(request).await
        }
    }

    /// Deploy from a scratch copy of the output. The copy is removed when
    /// `workspace` goes out of scope, on success and on failure alike.
    async fn deploy_isolated(
        &self,
        request: &DeployRequest<'_>,
    ) -> Result<DeployReport> {
        let workspace = IsolatedWorkspace::create(request.strategy)?;

        let mut strategy = request.strategy.clone();
        if strategy.asset_dir.as_deref() == Some(Path::new(".")) {
            strategy.asset_ignore.push(PathBuf::from(MANIFEST_FILE));
        }

        WranglerManifest::for_strategy(
            &strategy,
            Path::new("."),
            &request.name,
            &request.compatibility_date,
        )
        .write(workspace.path())?;
        write_assets_ignore(&strategy, workspace.path())?;

        let spec = deploy_command(workspace.path(), request.dry_run);
        info!(
            "deploying {} from isolated copy of {}",
            request.name,
            strategy.output_dir.display()
        );
        self.runner.run(&spec).await?;

        Ok(report(request, None, &spec))
    }

    async fn deploy_in_place(
        &self,
        request: &DeployRequest<'_>,
    ) -> Result<DeployReport> {
        let strategy = request.strategy;
        let root = request.project_root;
        let base = relative_to(root, &strategy.output_dir);

        if !strategy.has_server() {
            let assets = strategy
                .asset_dir
                .as_ref()
                .map_or_else(|| base.clone(), |dir| base.join(dir));
            let spec = deploy_command(root, request.dry_run).args([
                "--assets".to_string(),
                to_slash(&assets),
                "--name".to_string(),
                request.name.clone(),
                "--compatibility-date".to_string(),
                request.compatibility_date.clone(),
            ]);
            info!("deploying {} as static assets", request.name);
            self.runner.run(&spec).await?;
            return Ok(report(request, None, &spec));
        }

        let manifest = match existing_platform_config(root) {
            Some(existing) => {
                info!("using existing platform config {}", existing.display());
                None
            }
            None => {
                let path = WranglerManifest::for_strategy(
                    strategy,
                    &base,
                    &request.name,
                    &request.compatibility_date,
                )
                .write(root)?;
                debug!("wrote {}", path.display());
                Some(path)
            }
        };
        write_assets_ignore(strategy, &strategy.output_dir)?;

        let spec = deploy_command(root, request.dry_run);
        info!("deploying {} from {}", request.name, root.display());
        self.runner.run(&spec).await?;

        Ok(report(request, manifest, &spec))
    }
}

fn deploy_command(cwd: &Path, dry_run: bool) -> CommandSpec {
    let spec =
        CommandSpec::new(DEPLOY_PROGRAM, cwd).args(DEPLOY_ARGS.iter().copied());
    if dry_run { spec.arg("--dry-run") } else { spec }
}

fn report(
    request: &DeployRequest<'_>,
    manifest: Option<PathBuf>,
    spec: &CommandSpec,
) -> DeployReport {
    DeployReport {
        name: request.name.clone(),
        kind: request.strategy.kind,
        isolated: request.strategy.isolation_required,
        manifest,
        command: spec.display(),
        dry_run: request.dry_run,
    }
}
