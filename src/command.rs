//! Subcommand implementations.
//!
//! Results go to stdout, either as JSON or as short human readable
//! summaries. Progress is reported through the logger.
use log::*;
use serde::Serialize;
use std::{path::Path, sync::Arc};

use crate::{
    Result,
    builder::FrameworkCommands,
    cli::{Args, Command, PipelineArgs},
    config::load_config,
    detection::DetectionResult,
    framework::{FrameworkId, list_variants},
    orchestrator::Orchestrator,
    package_manager::PackageManager,
    runner::{CommandRunner, ProcessRunner},
    strategy::{self, BuildArtifact, DeploymentStrategy},
};

pub async fn execute(args: &Args) -> Result<()> {
    match &args.command {
        Command::Deploy(pipeline) => deploy(&args.path, pipeline).await,
        Command::Build(pipeline) => build(&args.path, pipeline).await,
        Command::Detect { json } => detect(&args.path, *json),
        Command::Inspect {
            output_dir,
            framework,
            json,
        } => inspect(&args.path, output_dir, *framework, *json),
        Command::Frameworks => {
            frameworks();
            Ok(())
        }
    }
}

fn orchestrator(
    root: &Path,
    pipeline: &PipelineArgs,
) -> Result<Orchestrator> {
    let config = pipeline.apply(load_config(root)?);
    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner::new());

    Orchestrator::builder()
        .root(root)
        .config(config)
        .runner(runner)
        .dry_run(pipeline.dry_run)
        .skip_build(pipeline.skip_build)
        .build()
}

async fn deploy(root: &Path, pipeline: &PipelineArgs) -> Result<()> {
    let outcome = orchestrator(root, pipeline)?.deploy().await?;

    if pipeline.json {
        return print_json(&outcome);
    }

    let report = &outcome.deployment;
    if report.dry_run {
        info!("dry run finished for {}", report.name);
    } else {
        info!("deployed {}", report.name);
    }
    println!(
        "{} ({}) deployed as {}",
        report.name, outcome.build.detection.framework, report.kind
    );
    Ok(())
}

async fn build(root: &Path, pipeline: &PipelineArgs) -> Result<()> {
    let outcome = orchestrator(root, pipeline)?.build().await?;

    if pipeline.json {
        return print_json(&outcome);
    }

    print_detection(&outcome.detection);
    print_commands(outcome.package_manager, &outcome.commands);
    print_strategy(&outcome.strategy);
    Ok(())
}

fn detect(root: &Path, json: bool) -> Result<()> {
    let config = load_config(root)?;
    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner::new());
    let outcome = Orchestrator::builder()
        .root(root)
        .config(config)
        .runner(runner)
        .build()?
        .detect()?;

    if json {
        return print_json(&outcome);
    }

    print_detection(&outcome.detection);
    print_commands(outcome.package_manager, &outcome.commands);
    Ok(())
}

fn inspect(
    root: &Path,
    output_dir: &Path,
    framework: FrameworkId,
    json: bool,
) -> Result<()> {
    let variant = framework.variant();
    let output = strategy::locate_output_dir(root, variant, Some(output_dir))?;
    let artifact = BuildArtifact::probe(root, &output);
    let strategy = strategy::resolve(&artifact, variant)?;

    if json {
        return print_json(&strategy);
    }

    print_strategy(&strategy);
    Ok(())
}

fn frameworks() {
    for variant in list_variants() {
        println!(
            "{:<14} {:<14} {}",
            variant.id.as_str(),
            variant.id.display_name(),
            variant.output_dirs.join(", ")
        );
    }
}

fn print_detection(detection: &DetectionResult) {
    println!(
        "framework: {} (score {})",
        detection.framework, detection.score
    );
    for signal in &detection.signals {
        println!("  {signal}");
    }
}

fn print_commands(pm: PackageManager, commands: &FrameworkCommands) {
    println!("package manager: {pm}");
    if let Some(build) = &commands.build_command {
        println!("  build: {build}");
    }
    if let Some(dev) = &commands.dev_command {
        println!("  dev: {dev}");
    }
}

fn print_strategy(strategy: &DeploymentStrategy) {
    println!("deployment: {}", strategy.kind);
    println!("  output: {}", strategy.output_dir.display());
    if let Some(entry) = &strategy.server_entry {
        println!("  server entry: {}", entry.display());
    }
    if let Some(assets) = &strategy.asset_dir {
        println!("  assets: {}", assets.display());
    }
    if !strategy.compatibility_flags.is_empty() {
        println!("  flags: {}", strategy.compatibility_flags.join(", "));
    }
    if strategy.isolation_required {
        println!("  isolated: yes");
    }
    if let Some(warning) = &strategy.warning {
        println!("  warning: {warning}");
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
