//! Supported front-end frameworks and their static registry entries.
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod registry;

pub use registry::{W_CONFIG, list_variants};

/// Closed set of framework variants edgeship knows how to deploy.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
    ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum FrameworkId {
    Nextjs,
    Astro,
    Sveltekit,
    Nuxt,
    ReactVite,
    ReactRouter,
    Remix,
    Angular,
    Static,
    Unknown,
}

impl FrameworkId {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nextjs => "nextjs",
            Self::Astro => "astro",
            Self::Sveltekit => "sveltekit",
            Self::Nuxt => "nuxt",
            Self::ReactVite => "react-vite",
            Self::ReactRouter => "react-router",
            Self::Remix => "remix",
            Self::Angular => "angular",
            Self::Static => "static",
            Self::Unknown => "unknown",
        }
    }

    /// Human readable name used in log output.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Nextjs => "Next.js",
            Self::Astro => "Astro",
            Self::Sveltekit => "SvelteKit",
            Self::Nuxt => "Nuxt",
            Self::ReactVite => "React (Vite)",
            Self::ReactRouter => "React Router",
            Self::Remix => "Remix",
            Self::Angular => "Angular",
            Self::Static => "Static site",
            Self::Unknown => "Unknown",
        }
    }

    /// Registry entry for this framework.
    pub fn variant(self) -> &'static FrameworkVariant {
        match self {
            Self::Nextjs => &registry::NEXTJS,
            Self::Astro => &registry::ASTRO,
            Self::Sveltekit => &registry::SVELTEKIT,
            Self::Nuxt => &registry::NUXT,
            Self::ReactVite => &registry::REACT_VITE,
            Self::ReactRouter => &registry::REACT_ROUTER,
            Self::Remix => &registry::REMIX,
            Self::Angular => &registry::ANGULAR,
            Self::Static => &registry::STATIC,
            Self::Unknown => &registry::UNKNOWN,
        }
    }
}

impl Display for FrameworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a framework's build output is expected to be served.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentHint {
    /// Plain assets, no server code.
    Static,
    /// The framework emits its own server entry.
    Ssr,
    /// Built through the OpenNext Cloudflare adapter.
    OpenNext,
    /// A framework plugin targets the platform directly.
    AdapterManaged,
}

impl DeploymentHint {
    /// Whether a third-party adapter owns the server entry point.
    pub fn is_adapter(&self) -> bool {
        matches!(self, Self::OpenNext | Self::AdapterManaged)
    }
}

/// Fixed output layout promised by a platform adapter.
///
/// When the entry file sits at a server entry location inside the
/// variant's output directory (Astro, SvelteKit), a finished build is
/// resolved as SSR before this layout is consulted. For those variants the
/// layout only serves to report a missing entry file as an incomplete
/// build, and `asset_dir` is never used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterLayout {
    /// Directory the adapter writes to, relative to the project root
    pub marker_dir: &'static str,
    /// Server entry file, relative to `marker_dir`
    pub entry_file: &'static str,
    /// Static asset directory, relative to `marker_dir`
    pub asset_dir: &'static str,
}

/// A registered framework with its detection signals and build defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkVariant {
    pub id: FrameworkId,
    /// Config files whose presence signals this framework. Paths may be
    /// nested, e.g. `src/app.html`.
    pub config_files: &'static [&'static str],
    /// Manifest dependency names that signal this framework
    pub dependencies: &'static [&'static str],
    /// Files that mark a deployable static site
    pub static_markers: &'static [&'static str],
    /// Score contributed by each matched dependency
    pub dependency_weight: u32,
    /// Build command template, `{run}` and `{exec}` are filled in by the
    /// package manager
    pub build_command: Option<&'static str>,
    pub dev_command: Option<&'static str>,
    /// Output directory candidates, most preferred first
    pub output_dirs: &'static [&'static str],
    pub hint: DeploymentHint,
    pub adapter: Option<AdapterLayout>,
}

impl FrameworkVariant {
    /// Whether this variant takes part in weighted scoring. The static and
    /// unknown fallbacks carry no dependency or config signals.
    pub fn is_scored(&self) -> bool {
        !self.dependencies.is_empty() || !self.config_files.is_empty()
    }

    /// Highest score this variant can reach from manifest and config signals.
    pub fn max_score(&self) -> u32 {
        let config = if self.config_files.is_empty() {
            0
        } else {
            W_CONFIG
        };
        config + self.dependency_weight * self.dependencies.len() as u32
    }
}
