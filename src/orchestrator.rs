//! Sequences detection, build, strategy resolution, and deployment.
use derive_builder::Builder;
use log::*;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    EdgeshipError, Result,
    builder::{self, FrameworkCommands},
    config::Config,
    deploy::{DeployReport, DeployRequest, Deployer, manifest, worker_name},
    detection::{DetectionResult, Detector, ProjectProbe},
    framework::FrameworkId,
    package_manager::{self, PackageManager},
    runner::CommandRunner,
    strategy::{self, BuildArtifact, DeploymentStrategy},
};

#[derive(Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct OrchestratorParams {
    /// Directory edgeship was pointed at
    pub root: PathBuf,
    #[builder(default)]
    pub config: Config,
    pub runner: Arc<dyn CommandRunner>,
    #[builder(default)]
    pub dry_run: bool,
    /// Reuse existing build output instead of installing and building
    #[builder(default)]
    pub skip_build: bool,
}

impl OrchestratorParamsBuilder {
    pub fn build(&self) -> Result<Orchestrator> {
        let params = self._build().map_err(|e| {
            EdgeshipError::invalid_config(format!(
                "Failed to build orchestrator: {}",
                e
            ))
        })?;
        Orchestrator::new(params)
    }
}

/// Detection plus the commands edgeship would run for the project.
#[derive(Debug, Clone, Serialize)]
pub struct DetectOutcome {
    #[serde(flatten)]
    pub detection: DetectionResult,
    pub package_manager: PackageManager,
    #[serde(flatten)]
    pub commands: FrameworkCommands,
}

/// Everything the build phase produced.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutcome {
    pub detection: DetectionResult,
    pub package_manager: PackageManager,
    #[serde(flatten)]
    pub commands: FrameworkCommands,
    pub strategy: DeploymentStrategy,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeployOutcome {
    #[serde(flatten)]
    pub build: BuildOutcome,
    pub deployment: DeployReport,
}

pub struct Orchestrator {
    root: PathBuf,
    config: Config,
    runner: Arc<dyn CommandRunner>,
    dry_run: bool,
    skip_build: bool,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorParamsBuilder {
        OrchestratorParamsBuilder::default()
    }

    pub fn new(params: OrchestratorParams) -> Result<Self> {
        if !params.root.is_dir() {
            return Err(EdgeshipError::ProjectNotFound(params.root));
        }
        params.config.validate()?;

        Ok(Self {
            root: params.root,
            config: params.config,
            runner: params.runner,
            dry_run: params.dry_run,
            skip_build: params.skip_build,
        })
    }

    /// Directory of the project being deployed, after applying `app_dir`.
    pub fn project_root(&self) -> PathBuf {
        match &self.config.app_dir {
            Some(dir) => self.root.join(dir),
            None => self.root.clone(),
        }
    }

    fn detector(&self) -> Result<Detector> {
        let root = self.project_root();
        if !root.is_dir() {
            return Err(EdgeshipError::ProjectNotFound(root));
        }
        Ok(Detector::new(root).with_override(self.config.framework))
    }

    pub fn detect(&self) -> Result<DetectOutcome> {
        let detector = self.detector()?;
        let probe = detector.probe()?;
        let detection = detector.classify(&probe)?;
        let pm = self.package_manager(&probe);

        Ok(DetectOutcome {
            commands: self.commands(detection.framework, pm),
            detection,
            package_manager: pm,
        })
    }

    /// Configured package manager, else the one owning the lock file.
    fn package_manager(&self, probe: &ProjectProbe) -> PackageManager {
        self.config
            .package_manager
            .unwrap_or_else(|| PackageManager::from_lockfiles(&probe.lockfiles))
    }

    fn commands(
        &self,
        framework: FrameworkId,
        pm: PackageManager,
    ) -> FrameworkCommands {
        builder::commands(framework, pm, self.config.build_command.as_deref())
    }

    /// Detect, install, configure, and build, then resolve how the output
    /// should be served.
    pub async fn build(&self) -> Result<BuildOutcome> {
        let detector = self.detector()?;
        let root = detector.root().to_path_buf();
        let probe = detector.probe()?;
        let detection = detector.classify(&probe)?;
        let framework = detection.framework;

        let pm = self.package_manager(&probe);
        debug!("using package manager {pm}");

        if self.skip_build {
            info!("skipping build, using existing output");
        } else {
            self.install(&probe, pm).await?;

            let plan = builder::plan(
                framework,
                &probe,
                pm,
                self.config.build_command.as_deref(),
            );
            builder::configure(self.runner.as_ref(), &root, &plan.configure)
                .await?;

            match &plan.build {
                Some(spec) => {
                    info!("building {}", framework.display_name());
                    self.runner.run(spec).await?;
                }
                None => debug!("{framework} has no build step"),
            }
        }

        let override_dir = self
            .config
            .output_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| detection.output_dir.clone());
        let variant = framework.variant();
        let output_dir = strategy::locate_output_dir(
            &root,
            variant,
            override_dir.as_deref(),
        )?;

        let artifact = BuildArtifact::probe(&root, &output_dir);
        let strategy = strategy::resolve(&artifact, variant)?;

        Ok(BuildOutcome {
            commands: self.commands(framework, pm),
            detection,
            package_manager: pm,
            strategy,
        })
    }

    /// Run the full pipeline and hand the result to the deploy CLI.
    pub async fn deploy(&self) -> Result<DeployOutcome> {
        let build = self.build().await?;
        let root = self.project_root();
        let name = self.worker_name(&root, &build.detection);

        let request = DeployRequest {
            strategy: &build.strategy,
            project_root: &root,
            name,
            compatibility_date: self.config.compatibility_date.clone(),
            dry_run: self.dry_run,
        };

        let deployment =
            Deployer::new(Arc::clone(&self.runner)).deploy(&request).await?;

        Ok(DeployOutcome { build, deployment })
    }

    async fn install(
        &self,
        probe: &ProjectProbe,
        pm: PackageManager,
    ) -> Result<()> {
        if !probe.has_manifest {
            debug!("no manifest, nothing to install");
            return Ok(());
        }
        if self.config.skip_install {
            info!("skipping dependency installation");
            return Ok(());
        }

        info!("installing dependencies with {pm}");
        package_manager::install(
            self.runner.as_ref(),
            pm,
            &probe.root,
            !probe.lockfiles.is_empty(),
        )
        .await
    }

    /// Configured name, else manifest name, else the directory name.
    fn worker_name(&self, root: &Path, detection: &DetectionResult) -> String {
        let raw = self
            .config
            .name
            .clone()
            .or_else(|| detection.project_name.clone())
            .or_else(|| {
                let dir = fs::canonicalize(root).ok()?;
                Some(dir.file_name()?.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| manifest::DEFAULT_WORKER_NAME.to_string());

        worker_name(&raw)
    }
}
