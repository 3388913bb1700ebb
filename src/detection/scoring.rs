//! Weighted scoring of registry variants against a project probe.
use crate::{
    detection::{
        probe::ProjectProbe,
        types::{MatchedSignal, VariantScore},
    },
    framework::{FrameworkVariant, W_CONFIG},
};

/// Score a single variant. A matching config file counts once, each
/// matching dependency adds the variant's dependency weight.
pub fn score_variant(
    variant: &FrameworkVariant,
    probe: &ProjectProbe,
) -> VariantScore {
    let mut score = 0;
    let mut signals = vec![];

    if let Some(file) = variant
        .config_files
        .iter()
        .find(|file| probe.has_config_file(file))
    {
        score += W_CONFIG;
        signals.push(MatchedSignal::ConfigFile(file.to_string()));
    }

    for dep in variant.dependencies {
        if probe.has_dependency(dep) {
            score += variant.dependency_weight;
            signals.push(MatchedSignal::Dependency(dep.to_string()));
        }
    }

    VariantScore {
        framework: variant.id,
        score,
        signals,
    }
}

/// Pick the strictly highest non-zero score. `scores` must be in registry
/// order: on a tie the earlier entry wins.
pub fn select_best(scores: &[VariantScore]) -> Option<&VariantScore> {
    scores.iter().fold(None, |best, candidate| {
        if candidate.score == 0 {
            return best;
        }
        match best {
            Some(current) if current.score >= candidate.score => Some(current),
            _ => Some(candidate),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{framework::FrameworkId, test_helpers::ProjectFixture};

    fn score(id: FrameworkId, project: &ProjectFixture) -> VariantScore {
        let probe = ProjectProbe::collect(project.path()).unwrap();
        score_variant(id.variant(), &probe)
    }

    fn entry(framework: FrameworkId, score: u32) -> VariantScore {
        VariantScore {
            framework,
            score,
            signals: vec![],
        }
    }

    #[test]
    fn config_file_counts_once() {
        let project = ProjectFixture::new()
            .package_json(&[], &[])
            .file("next.config.js", "")
            .file("next.config.mjs", "");

        let result = score(FrameworkId::Nextjs, &project);

        assert_eq!(result.score, W_CONFIG);
        assert_eq!(
            result.signals,
            vec![MatchedSignal::ConfigFile("next.config.js".into())]
        );
    }

    #[test]
    fn each_dependency_adds_variant_weight() {
        let project = ProjectFixture::new()
            .package_json(&["@remix-run/react"], &["@remix-run/dev"]);

        let result = score(FrameworkId::Remix, &project);

        let weight = FrameworkId::Remix.variant().dependency_weight;
        assert_eq!(result.score, 2 * weight);
        assert_eq!(result.signals.len(), 2);
    }

    #[test]
    fn unrelated_project_scores_zero() {
        let project = ProjectFixture::new().package_json(&["express"], &[]);

        let result = score(FrameworkId::Astro, &project);

        assert_eq!(result.score, 0);
        assert!(result.signals.is_empty());
    }

    #[test]
    fn select_best_prefers_strictly_higher_score() {
        let scores = vec![
            entry(FrameworkId::Nextjs, 0),
            entry(FrameworkId::Astro, 25),
            entry(FrameworkId::ReactVite, 55),
        ];

        let best = select_best(&scores).unwrap();

        assert_eq!(best.framework, FrameworkId::ReactVite);
    }

    #[test]
    fn select_best_breaks_ties_by_registry_order() {
        let scores = vec![
            entry(FrameworkId::Astro, 100),
            entry(FrameworkId::Nuxt, 100),
        ];

        let best = select_best(&scores).unwrap();

        assert_eq!(best.framework, FrameworkId::Astro);
    }

    #[test]
    fn select_best_ignores_all_zero_scores() {
        let scores = vec![
            entry(FrameworkId::Astro, 0),
            entry(FrameworkId::Nuxt, 0),
        ];

        assert!(select_best(&scores).is_none());
    }
}
