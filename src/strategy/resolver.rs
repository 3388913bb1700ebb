//! Maps a build artifact to a deployment topology.
//!
//! Rules are checked in priority order and the first match wins. Hybrid
//! must come before pure SSR because both carry a server entry.
use log::*;
use std::path::{Component, Path, PathBuf};

use crate::{
    Result,
    error::EdgeshipError,
    framework::{AdapterLayout, FrameworkVariant},
    strategy::{
        artifact::{BuildArtifact, ROUTES_MANIFEST},
        types::{DeploymentStrategy, DeploymentType},
    },
};

/// Sibling asset directories emitted next to a `server/` entry.
const SERVER_ASSET_DIRS: &[&str] = &["public", "client", "assets", "static"];

pub fn resolve(
    artifact: &BuildArtifact,
    variant: &FrameworkVariant,
) -> Result<DeploymentStrategy> {
    let strategy = match (&artifact.server_entry, artifact.has_static_index) {
        (Some(entry), true) => hybrid(artifact, entry),
        (Some(entry), false) => ssr(artifact, entry, variant),
        (None, _) => match adapter(artifact, variant)? {
            Some(strategy) => strategy,
            None if artifact.has_static_index => static_site(artifact),
            None => unknown_layout(artifact, variant),
        },
    };

    info!(
        "resolved {} deployment for {} (isolated: {})",
        strategy.kind,
        variant.id.display_name(),
        strategy.isolation_required
    );

    Ok(strategy)
}

/// Server worker next to fully static output. Only the static part is
/// deployed, from a scratch copy without the worker or its routes.
fn hybrid(artifact: &BuildArtifact, entry: &Path) -> DeploymentStrategy {
    let mut strategy = DeploymentStrategy::new(
        DeploymentType::Hybrid,
        artifact.output_dir.clone(),
    );

    strategy.asset_dir = Some(PathBuf::from("."));
    strategy.isolation_required = true;
    strategy.excluded_files.push(top_level(entry));
    if artifact.contains(ROUTES_MANIFEST) {
        strategy.excluded_files.push(PathBuf::from(ROUTES_MANIFEST));
    }

    strategy
}

fn ssr(
    artifact: &BuildArtifact,
    entry: &Path,
    variant: &FrameworkVariant,
) -> DeploymentStrategy {
    let mut strategy = DeploymentStrategy::new(
        DeploymentType::Ssr,
        artifact.output_dir.clone(),
    );

    strategy.server_entry = Some(entry.to_path_buf());
    strategy.isolation_required = !variant.hint.is_adapter();

    let entry_root = top_level(entry);
    if entry_root == Path::new("server") {
        strategy.asset_dir = SERVER_ASSET_DIRS
            .iter()
            .find(|dir| artifact.output_dir.join(dir).is_dir())
            .map(PathBuf::from);
    } else {
        strategy.asset_dir = Some(PathBuf::from("."));
        strategy.asset_ignore.push(entry_root);
        if artifact.contains(ROUTES_MANIFEST) {
            strategy.asset_ignore.push(PathBuf::from(ROUTES_MANIFEST));
        }
    }

    strategy
}

/// Adapter output contract. `Ok(None)` when the adapter did not run at all,
/// an error when it ran but left out its entry file.
fn adapter(
    artifact: &BuildArtifact,
    variant: &FrameworkVariant,
) -> Result<Option<DeploymentStrategy>> {
    let Some(AdapterLayout {
        marker_dir,
        entry_file,
        asset_dir,
    }) = variant.adapter
    else {
        return Ok(None);
    };

    let marker = artifact.project_root.join(marker_dir);
    if !marker.is_dir() {
        return Ok(None);
    }

    let entry = marker.join(entry_file);
    if !entry.is_file() {
        return Err(EdgeshipError::BuildArtifactIncomplete {
            framework: variant.id,
            expected: Path::new(marker_dir).join(entry_file),
        });
    }

    let mut strategy =
        DeploymentStrategy::new(DeploymentType::PlatformAdapter, marker);
    strategy.server_entry = Some(PathBuf::from(entry_file));
    strategy.asset_dir = Some(PathBuf::from(asset_dir));

    Ok(Some(strategy))
}

fn static_site(artifact: &BuildArtifact) -> DeploymentStrategy {
    let mut strategy = DeploymentStrategy::new(
        DeploymentType::Static,
        artifact.output_dir.clone(),
    );
    strategy.asset_dir = Some(PathBuf::from("."));
    strategy
}

/// Unrecognised layout: upload everything as assets and say so.
fn unknown_layout(
    artifact: &BuildArtifact,
    variant: &FrameworkVariant,
) -> DeploymentStrategy {
    let message = format!(
        "unrecognized build output structure in {} for {}: deploying it as static assets",
        artifact.output_dir.display(),
        variant.id.display_name()
    );
    warn!("{message}");

    let mut strategy = DeploymentStrategy::new(
        DeploymentType::Unknown,
        artifact.output_dir.clone(),
    );
    strategy.asset_dir = Some(PathBuf::from("."));
    strategy.warning = Some(message);
    strategy
}

fn top_level(path: &Path) -> PathBuf {
    path.components()
        .find_map(|c| match c {
            Component::Normal(name) => Some(PathBuf::from(name)),
            _ => None,
        })
        .unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{framework::FrameworkId, test_helpers::ProjectFixture};

    fn resolve_in(
        project: &ProjectFixture,
        output: &str,
        framework: FrameworkId,
    ) -> Result<DeploymentStrategy> {
        let artifact =
            BuildArtifact::probe(project.path(), &project.join(output));
        resolve(&artifact, framework.variant())
    }

    #[test]
    fn worker_plus_index_is_hybrid_and_isolated() {
        let project = ProjectFixture::new()
            .file("dist/_worker.js", "export default {}")
            .file("dist/_routes.json", "{}")
            .file("dist/index.html", "<html/>");

        let strategy =
            resolve_in(&project, "dist", FrameworkId::Astro).unwrap();

        assert_eq!(strategy.kind, DeploymentType::Hybrid);
        assert!(strategy.isolation_required);
        assert!(strategy.server_entry.is_none());
        assert_eq!(
            strategy.excluded_files,
            vec![PathBuf::from("_worker.js"), PathBuf::from("_routes.json")]
        );
        assert!(strategy.compatibility_flags.is_empty());
    }

    #[test]
    fn hybrid_excludes_whole_worker_directory() {
        let project = ProjectFixture::new()
            .file("dist/_worker.js/index.js", "")
            .file("dist/_worker.js/chunks/a.js", "")
            .file("dist/index.html", "<html/>");

        let strategy =
            resolve_in(&project, "dist", FrameworkId::Astro).unwrap();

        assert_eq!(strategy.kind, DeploymentType::Hybrid);
        assert_eq!(strategy.excluded_files, vec![PathBuf::from("_worker.js")]);
    }

    #[test]
    fn framework_server_entry_is_isolated_ssr() {
        let project = ProjectFixture::new()
            .file(".output/server/index.mjs", "")
            .file(".output/public/favicon.ico", "");

        let strategy =
            resolve_in(&project, ".output", FrameworkId::Nuxt).unwrap();

        assert_eq!(strategy.kind, DeploymentType::Ssr);
        assert!(strategy.isolation_required);
        assert_eq!(
            strategy.server_entry,
            Some(PathBuf::from("server/index.mjs"))
        );
        assert_eq!(strategy.asset_dir, Some(PathBuf::from("public")));
        assert_eq!(strategy.compatibility_flags, vec!["nodejs_compat"]);
        assert!(strategy.excluded_files.is_empty());
    }

    #[test]
    fn react_router_client_dir_is_asset_dir() {
        let project = ProjectFixture::new()
            .file("build/server/index.js", "")
            .file("build/client/assets/app.js", "");

        let strategy =
            resolve_in(&project, "build", FrameworkId::ReactRouter).unwrap();

        assert_eq!(strategy.kind, DeploymentType::Ssr);
        assert_eq!(strategy.asset_dir, Some(PathBuf::from("client")));
    }

    #[test]
    fn adapter_emitted_worker_deploys_in_place() {
        let project = ProjectFixture::new()
            .file("dist/_worker.js/index.js", "")
            .file("dist/_astro/app.css", "");

        let strategy =
            resolve_in(&project, "dist", FrameworkId::Astro).unwrap();

        assert_eq!(strategy.kind, DeploymentType::Ssr);
        assert!(!strategy.isolation_required);
        assert_eq!(strategy.asset_dir, Some(PathBuf::from(".")));
        assert_eq!(strategy.asset_ignore, vec![PathBuf::from("_worker.js")]);
    }

    #[test]
    fn sveltekit_adapter_output_resolves_as_ssr_before_layout() {
        let project = ProjectFixture::new()
            .file(".svelte-kit/cloudflare/_worker.js", "")
            .file(".svelte-kit/cloudflare/_app/app.js", "");

        let strategy = resolve_in(
            &project,
            ".svelte-kit/cloudflare",
            FrameworkId::Sveltekit,
        )
        .unwrap();

        assert_eq!(strategy.kind, DeploymentType::Ssr);
        assert!(!strategy.isolation_required);
        assert_eq!(strategy.server_entry, Some(PathBuf::from("_worker.js")));
    }

    #[test]
    fn sveltekit_layout_reports_missing_worker() {
        let project = ProjectFixture::new()
            .file(".svelte-kit/cloudflare/_app/app.js", "");

        let err = resolve_in(
            &project,
            ".svelte-kit/cloudflare",
            FrameworkId::Sveltekit,
        )
        .unwrap_err();

        match err {
            EdgeshipError::BuildArtifactIncomplete { expected, .. } => {
                assert_eq!(
                    expected,
                    PathBuf::from(".svelte-kit/cloudflare/_worker.js")
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn open_next_output_is_platform_adapter() {
        let project = ProjectFixture::new()
            .file(".open-next/worker.js", "")
            .file(".open-next/assets/_next/app.js", "");

        let strategy =
            resolve_in(&project, ".open-next", FrameworkId::Nextjs).unwrap();

        assert_eq!(strategy.kind, DeploymentType::PlatformAdapter);
        assert!(!strategy.isolation_required);
        assert_eq!(strategy.output_dir, project.join(".open-next"));
        assert_eq!(strategy.server_entry, Some(PathBuf::from("worker.js")));
        assert_eq!(strategy.asset_dir, Some(PathBuf::from("assets")));
        assert_eq!(
            strategy.compatibility_flags,
            vec!["nodejs_compat", "global_fetch_strictly_public"]
        );
    }

    #[test]
    fn missing_adapter_entry_is_incomplete_build() {
        let project =
            ProjectFixture::new().file(".open-next/assets/index.html", "");

        let err = resolve_in(&project, ".open-next", FrameworkId::Nextjs)
            .unwrap_err();

        match err {
            EdgeshipError::BuildArtifactIncomplete { framework, expected } => {
                assert_eq!(framework, FrameworkId::Nextjs);
                assert_eq!(expected, PathBuf::from(".open-next/worker.js"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn index_only_is_static_in_place() {
        let project = ProjectFixture::new()
            .file("dist/index.html", "<html/>")
            .file("dist/assets/app.js", "");

        let strategy =
            resolve_in(&project, "dist", FrameworkId::ReactVite).unwrap();

        assert_eq!(strategy.kind, DeploymentType::Static);
        assert!(!strategy.isolation_required);
        assert!(strategy.server_entry.is_none());
        assert_eq!(strategy.asset_dir, Some(PathBuf::from(".")));
    }

    #[test]
    fn unrecognized_layout_degrades_with_warning() {
        let project = ProjectFixture::new().file("dist/bundle.js", "");

        let strategy =
            resolve_in(&project, "dist", FrameworkId::Unknown).unwrap();

        assert_eq!(strategy.kind, DeploymentType::Unknown);
        assert!(!strategy.isolation_required);
        assert!(strategy.warning.is_some());
        assert_eq!(strategy.asset_dir, Some(PathBuf::from(".")));
    }

    #[test]
    fn top_level_of_nested_entry() {
        assert_eq!(
            top_level(Path::new("_worker.js/index.js")),
            PathBuf::from("_worker.js")
        );
        assert_eq!(top_level(Path::new("server")), PathBuf::from("server"));
    }
}
