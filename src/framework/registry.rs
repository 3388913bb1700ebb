//! Static framework registry.
//!
//! Declaration order matters: when two variants reach the same non-zero
//! score, the one declared first wins. Weights are fixed here rather than
//! computed so the tie-break policy can be read in one place:
//!
//! | variant      | W_dep | signal                                   |
//! |--------------|-------|------------------------------------------|
//! | nextjs       | 100   | `next`                                   |
//! | astro        | 100   | `astro`                                  |
//! | sveltekit    | 100   | `@sveltejs/kit`                          |
//! | nuxt         | 100   | `nuxt`                                   |
//! | react-router | 95    | `@react-router/dev`                      |
//! | remix        | 90    | `@remix-run/*`                           |
//! | angular      | 80    | `@angular/core`                          |
//! | react-vite   | 10    | `vite`, `react` (shared build tooling)   |
//!
//! Flagship weights must stay above the highest score any low-tier variant
//! can reach, otherwise a meta-framework built on Vite could lose to Vite.
use crate::framework::{
    AdapterLayout, DeploymentHint, FrameworkId, FrameworkVariant,
};

/// Score contributed when any of a variant's config files exists.
pub const W_CONFIG: u32 = 25;

/// Score assigned to a static site found through its index marker.
pub const W_STATIC_MARKER: u32 = 10;

/// Weight at or above which a dependency fully identifies its framework.
pub const FLAGSHIP_WEIGHT_FLOOR: u32 = 80;

const RUN_BUILD: Option<&str> = Some("{run} build");
const RUN_DEV: Option<&str> = Some("{run} dev");

pub const NEXTJS: FrameworkVariant = FrameworkVariant {
    id: FrameworkId::Nextjs,
    config_files: &["next.config.js", "next.config.mjs", "next.config.ts"],
    dependencies: &["next", "@opennextjs/cloudflare"],
    static_markers: &[],
    dependency_weight: 100,
    build_command: Some("{exec} opennextjs-cloudflare build"),
    dev_command: RUN_DEV,
    output_dirs: &[".open-next"],
    hint: DeploymentHint::OpenNext,
    adapter: Some(AdapterLayout {
        marker_dir: ".open-next",
        entry_file: "worker.js",
        asset_dir: "assets",
    }),
};

pub const ASTRO: FrameworkVariant = FrameworkVariant {
    id: FrameworkId::Astro,
    config_files: &["astro.config.mjs", "astro.config.js", "astro.config.ts"],
    dependencies: &["astro", "@astrojs/cloudflare"],
    static_markers: &[],
    dependency_weight: 100,
    build_command: RUN_BUILD,
    dev_command: RUN_DEV,
    output_dirs: &["dist"],
    hint: DeploymentHint::AdapterManaged,
    adapter: Some(AdapterLayout {
        marker_dir: "dist/_worker.js",
        entry_file: "index.js",
        asset_dir: "..",
    }),
};

pub const SVELTEKIT: FrameworkVariant = FrameworkVariant {
    id: FrameworkId::Sveltekit,
    config_files: &[
        "svelte.config.js",
        "svelte.config.mjs",
        "svelte.config.ts",
        "src/app.html",
    ],
    dependencies: &["@sveltejs/kit", "@sveltejs/adapter-cloudflare"],
    static_markers: &[],
    dependency_weight: 100,
    build_command: RUN_BUILD,
    dev_command: RUN_DEV,
    output_dirs: &[".svelte-kit/cloudflare", "build"],
    hint: DeploymentHint::AdapterManaged,
    adapter: Some(AdapterLayout {
        marker_dir: ".svelte-kit/cloudflare",
        entry_file: "_worker.js",
        asset_dir: ".",
    }),
};

pub const NUXT: FrameworkVariant = FrameworkVariant {
    id: FrameworkId::Nuxt,
    config_files: &["nuxt.config.ts", "nuxt.config.js", "nuxt.config.mjs"],
    dependencies: &["nuxt"],
    static_markers: &[],
    dependency_weight: 100,
    build_command: RUN_BUILD,
    dev_command: RUN_DEV,
    output_dirs: &[".output", "dist"],
    hint: DeploymentHint::Ssr,
    adapter: None,
};

pub const REACT_ROUTER: FrameworkVariant = FrameworkVariant {
    id: FrameworkId::ReactRouter,
    config_files: &["react-router.config.ts", "react-router.config.js"],
    dependencies: &["@react-router/dev", "@react-router/cloudflare"],
    static_markers: &[],
    dependency_weight: 95,
    build_command: RUN_BUILD,
    dev_command: RUN_DEV,
    output_dirs: &["build"],
    hint: DeploymentHint::Ssr,
    adapter: None,
};

pub const REMIX: FrameworkVariant = FrameworkVariant {
    id: FrameworkId::Remix,
    config_files: &["remix.config.js", "remix.config.mjs"],
    dependencies: &[
        "@remix-run/react",
        "@remix-run/dev",
        "@remix-run/cloudflare",
    ],
    static_markers: &[],
    dependency_weight: 90,
    build_command: RUN_BUILD,
    dev_command: RUN_DEV,
    output_dirs: &["build", "public/build"],
    hint: DeploymentHint::Ssr,
    adapter: None,
};

pub const ANGULAR: FrameworkVariant = FrameworkVariant {
    id: FrameworkId::Angular,
    config_files: &["angular.json"],
    dependencies: &["@angular/core", "@angular/cli"],
    static_markers: &[],
    dependency_weight: 80,
    build_command: RUN_BUILD,
    dev_command: Some("{run} start"),
    output_dirs: &["dist/*/browser", "dist/*", "dist"],
    hint: DeploymentHint::Static,
    adapter: None,
};

pub const REACT_VITE: FrameworkVariant = FrameworkVariant {
    id: FrameworkId::ReactVite,
    config_files: &["vite.config.ts", "vite.config.js", "vite.config.mjs"],
    dependencies: &["vite", "@vitejs/plugin-react", "react"],
    static_markers: &[],
    dependency_weight: 10,
    build_command: RUN_BUILD,
    dev_command: RUN_DEV,
    output_dirs: &["dist", "build"],
    hint: DeploymentHint::Static,
    adapter: None,
};

pub const STATIC: FrameworkVariant = FrameworkVariant {
    id: FrameworkId::Static,
    config_files: &[],
    dependencies: &[],
    static_markers: &["index.html"],
    dependency_weight: 0,
    build_command: None,
    dev_command: None,
    output_dirs: &[".", "public", "dist", "build", "out", "_site"],
    hint: DeploymentHint::Static,
    adapter: None,
};

pub const UNKNOWN: FrameworkVariant = FrameworkVariant {
    id: FrameworkId::Unknown,
    config_files: &[],
    dependencies: &[],
    static_markers: &[],
    dependency_weight: 0,
    build_command: None,
    dev_command: None,
    output_dirs: &["dist", "build", "out", "public"],
    hint: DeploymentHint::Static,
    adapter: None,
};

static VARIANTS: [&FrameworkVariant; 10] = [
    &NEXTJS,
    &ASTRO,
    &SVELTEKIT,
    &NUXT,
    &REACT_ROUTER,
    &REMIX,
    &ANGULAR,
    &REACT_VITE,
    &STATIC,
    &UNKNOWN,
];

/// All registered variants in declaration (tie-break) order.
pub fn list_variants() -> &'static [&'static FrameworkVariant] {
    &VARIANTS
}

/// Comma separated identifiers of every variant detection can produce.
pub fn supported_names() -> String {
    list_variants()
        .iter()
        .filter(|v| v.id != FrameworkId::Unknown)
        .map(|v| v.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use clap::ValueEnum;

    use super::*;

    #[test]
    fn registry_contains_every_framework_once() {
        let ids: HashSet<FrameworkId> =
            list_variants().iter().map(|v| v.id).collect();
        assert_eq!(ids.len(), list_variants().len());
        assert_eq!(ids.len(), FrameworkId::value_variants().len());
    }

    #[test]
    fn low_tier_variants_cannot_reach_flagship_weight() {
        let low_tier_max = list_variants()
            .iter()
            .filter(|v| v.is_scored())
            .filter(|v| v.dependency_weight < FLAGSHIP_WEIGHT_FLOOR)
            .map(|v| v.max_score())
            .max()
            .unwrap();

        let flagship_min = list_variants()
            .iter()
            .filter(|v| v.dependency_weight >= FLAGSHIP_WEIGHT_FLOOR)
            .map(|v| v.dependency_weight)
            .min()
            .unwrap();

        assert!(low_tier_max < flagship_min);
    }

    #[test]
    fn fallbacks_are_declared_last() {
        let ids: Vec<FrameworkId> =
            list_variants().iter().map(|v| v.id).collect();
        assert_eq!(ids[ids.len() - 2], FrameworkId::Static);
        assert_eq!(ids[ids.len() - 1], FrameworkId::Unknown);
    }

    #[test]
    fn adapter_layouts_only_on_adapter_hints() {
        for variant in list_variants() {
            if variant.adapter.is_some() {
                assert!(variant.hint.is_adapter(), "{}", variant.id);
            }
        }
    }

    #[test]
    fn supported_names_skip_unknown() {
        let names = supported_names();
        assert!(names.contains("nextjs"));
        assert!(names.contains("static"));
        assert!(!names.contains("unknown"));
    }
}
