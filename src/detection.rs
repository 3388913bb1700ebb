//! Framework detection for classifying a project directory.
//!
//! Detection runs in a fixed order:
//!
//! 1. Without a `package.json` only static-site detection is attempted.
//! 2. A monorepo root is never classified; its sub-projects are reported so
//!    the caller can pick one.
//! 3. Every scored registry variant is matched against the manifest and
//!    config files, and the strictly highest score wins (ties go to the
//!    earlier registry entry).
//! 4. If nothing scores, static-site detection runs as a last resort.
use log::*;
use std::path::{Path, PathBuf};

pub mod monorepo;
pub mod probe;
pub mod scoring;
pub mod static_site;
pub mod types;

use crate::{
    Result,
    error::EdgeshipError,
    framework::{FrameworkId, list_variants, registry},
};

pub use probe::ProjectProbe;
pub use types::{DetectionResult, MatchedSignal, VariantScore};

pub struct Detector {
    root: PathBuf,
    framework_override: Option<FrameworkId>,
}

impl Detector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            framework_override: None,
        }
    }

    /// Skip scoring and report `framework` instead.
    pub fn with_override(mut self, framework: Option<FrameworkId>) -> Self {
        self.framework_override = framework;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Probe and classify the project in one step.
    pub fn detect(&self) -> Result<DetectionResult> {
        let probe = self.probe()?;
        self.classify(&probe)
    }

    pub fn probe(&self) -> Result<ProjectProbe> {
        debug!("probing project at {}", self.root.display());
        ProjectProbe::collect(&self.root)
    }

    /// Classify a previously collected probe.
    pub fn classify(&self, probe: &ProjectProbe) -> Result<DetectionResult> {
        if let Some(framework) = self.framework_override {
            return Ok(self.overridden(framework, probe));
        }

        if !probe.has_manifest {
            debug!("no manifest found, trying static site detection");
            return self.static_site(probe);
        }

        if probe.is_monorepo_root() {
            let candidates = monorepo::discover_subprojects(&self.root)?;
            return Err(EdgeshipError::MonorepoAmbiguous {
                root: self.root.clone(),
                markers: probe.monorepo_markers.clone(),
                candidates,
            });
        }

        let scores = self.score_all(probe);

        if let Some(best) = scoring::select_best(&scores) {
            info!(
                "detected {} (score {})",
                best.framework.display_name(),
                best.score
            );
            return Ok(DetectionResult {
                framework: best.framework,
                score: best.score,
                signals: best.signals.clone(),
                output_dir: None,
                project_name: probe.project_name.clone(),
            });
        }

        debug!("no framework signals in manifest, trying static site");
        self.static_site(probe)
    }

    /// Scores for every scored variant, in registry order.
    pub fn score_all(&self, probe: &ProjectProbe) -> Vec<VariantScore> {
        list_variants()
            .iter()
            .filter(|variant| variant.is_scored())
            .map(|variant| {
                let score = scoring::score_variant(variant, probe);
                debug!(
                    "framework {} detection score: {}",
                    score.framework, score.score
                );
                score
            })
            .collect()
    }

    fn static_site(&self, probe: &ProjectProbe) -> Result<DetectionResult> {
        match static_site::find_static_root(&self.root) {
            Some((dir, marker)) => {
                info!("detected static site in {}", dir.display());
                Ok(DetectionResult {
                    framework: FrameworkId::Static,
                    score: registry::W_STATIC_MARKER,
                    signals: vec![MatchedSignal::StaticMarker(marker)],
                    output_dir: Some(dir),
                    project_name: probe.project_name.clone(),
                })
            }
            None => Err(EdgeshipError::NoFrameworkDetected {
                root: self.root.clone(),
                supported: registry::supported_names(),
            }),
        }
    }

    fn overridden(
        &self,
        framework: FrameworkId,
        probe: &ProjectProbe,
    ) -> DetectionResult {
        info!("using configured framework {}", framework.display_name());

        let output_dir = if framework == FrameworkId::Static {
            static_site::find_static_root(&self.root).map(|(dir, _)| dir)
        } else {
            None
        };

        DetectionResult {
            framework,
            score: 0,
            signals: vec![MatchedSignal::Override],
            output_dir,
            project_name: probe.project_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ProjectFixture;

    fn detect(project: &ProjectFixture) -> Result<DetectionResult> {
        Detector::new(project.path()).detect()
    }

    #[test]
    fn flagship_dependency_alone_detects_each_variant() {
        for variant in list_variants().iter().filter(|v| v.is_scored()) {
            let flagship = variant.dependencies[0];
            let project = ProjectFixture::new().package_json(&[flagship], &[]);

            let result = detect(&project).unwrap();

            assert_eq!(result.framework, variant.id, "flagship {flagship}");
            assert!(result.score > 0);
        }
    }

    #[test]
    fn meta_frameworks_outrank_their_build_tool() {
        let cases = [
            (FrameworkId::Remix, "@remix-run/react"),
            (FrameworkId::ReactRouter, "@react-router/dev"),
            (FrameworkId::Sveltekit, "@sveltejs/kit"),
            (FrameworkId::Astro, "astro"),
            (FrameworkId::Nextjs, "next"),
        ];

        for (expected, flagship) in cases {
            let project = ProjectFixture::new()
                .package_json(
                    &[flagship, "react"],
                    &["vite", "@vitejs/plugin-react"],
                )
                .file("vite.config.ts", "export default {}");

            let result = detect(&project).unwrap();

            assert_eq!(result.framework, expected);
        }
    }

    #[test]
    fn vite_react_project_without_meta_framework() {
        let project = ProjectFixture::new()
            .package_json(&["react", "react-dom"], &["vite"])
            .file("vite.config.ts", "export default {}");

        let result = detect(&project).unwrap();

        assert_eq!(result.framework, FrameworkId::ReactVite);
        assert_eq!(result.score, registry::W_CONFIG + 20);
        assert!(
            result
                .signals
                .contains(&MatchedSignal::ConfigFile("vite.config.ts".into()))
        );
    }

    #[test]
    fn monorepo_root_lists_example_candidates() {
        let project = ProjectFixture::new()
            .package_json(&["next"], &[])
            .file("turbo.json", "{}")
            .dir("examples/blog");

        let err = detect(&project).unwrap_err();

        match err {
            EdgeshipError::MonorepoAmbiguous {
                markers,
                candidates,
                ..
            } => {
                assert_eq!(markers, vec!["turbo.json".to_string()]);
                assert_eq!(candidates, vec![PathBuf::from("examples/blog")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn manifestless_index_html_is_static_at_root() {
        let project = ProjectFixture::new().file("index.html", "<html/>");

        let result = detect(&project).unwrap();

        assert_eq!(result.framework, FrameworkId::Static);
        assert_eq!(result.output_dir, Some(PathBuf::from(".")));
        assert!(result.score > 0);
    }

    #[test]
    fn manifest_without_signals_falls_back_to_static() {
        let project = ProjectFixture::new()
            .package_json(&["lodash"], &[])
            .file("public/index.html", "<html/>");

        let result = detect(&project).unwrap();

        assert_eq!(result.framework, FrameworkId::Static);
        assert_eq!(result.output_dir, Some(PathBuf::from("public")));
        assert_eq!(result.project_name.as_deref(), Some("fixture-app"));
    }

    #[test]
    fn empty_directory_is_no_framework_detected() {
        let project = ProjectFixture::new();

        let err = detect(&project).unwrap_err();

        assert!(matches!(err, EdgeshipError::NoFrameworkDetected { .. }));
        assert!(err.to_string().contains("sveltekit"));
    }

    #[test]
    fn malformed_manifest_is_distinct_from_no_framework() {
        let project = ProjectFixture::new()
            .file("package.json", "not json")
            .file("index.html", "<html/>");

        let err = detect(&project).unwrap_err();

        assert!(matches!(err, EdgeshipError::ManifestMalformed { .. }));
    }

    #[test]
    fn override_skips_scoring_and_monorepo_check() {
        let project = ProjectFixture::new()
            .package_json(&["next"], &[])
            .file("turbo.json", "{}");

        let result = Detector::new(project.path())
            .with_override(Some(FrameworkId::Astro))
            .detect()
            .unwrap();

        assert_eq!(result.framework, FrameworkId::Astro);
        assert_eq!(result.signals, vec![MatchedSignal::Override]);
    }

    #[test]
    fn detection_is_idempotent() {
        let project = ProjectFixture::new()
            .package_json(&["nuxt"], &[])
            .file("nuxt.config.ts", "export default {}");

        let first = detect(&project).unwrap();
        let second = detect(&project).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn detection_does_not_modify_project() {
        let project = ProjectFixture::new()
            .package_json(&["astro"], &[])
            .file("astro.config.mjs", "export default {}");

        let before = walkdir::WalkDir::new(project.path())
            .into_iter()
            .filter_map(|e| e.ok())
            .count();
        detect(&project).unwrap();
        let after = walkdir::WalkDir::new(project.path())
            .into_iter()
            .filter_map(|e| e.ok())
            .count();

        assert_eq!(before, after);
    }
}
