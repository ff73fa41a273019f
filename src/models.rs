//! Core data structures: invocation options, project layout and the fixed
//! paths the widget build works against.
//!
//! All paths are relative to the project root (the directory holding the
//! `error_analysis` package).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Widget build directory. Every widget yarn step runs here.
pub const WIDGET_JS_DIR: &str = "error_analysis/widget/js";

/// Visualization source directory, only touched with `--use-local-changes`.
pub const VIS_DIR: &str = "visualization/dashboard";

/// Build output of the visualization package, relative to [`VIS_DIR`].
pub const VIS_BUILD_OUTPUT: &str = "rel";

/// Where the registry copy of the visualization package lives, relative to
/// [`WIDGET_JS_DIR`].
pub const VENDORED_VIS_PATH: &str = "node_modules/error-analysis-dashboard/rel";

/// Directories left behind by a registry-based build, relative to [`WIDGET_JS_DIR`].
/// Removed in this order.
pub const CLEANUP_DIRS: [&str; 3] = ["dist", "lib", "node_modules"];

/// Generated artifacts that are committed and must not drift.
pub const WIDGET_GENERATED_FILES: [&str; 4] = [
    "error_analysis/widget/static/extension.js",
    "error_analysis/widget/static/extension.js.map",
    "error_analysis/widget/static/index.js",
    "error_analysis/widget/static/index.js.map",
];

/// Directory that must exist in the working directory for it to count as the
/// project root.
pub const ROOT_MARKER: &str = "error_analysis";

/// How working-tree status text is obtained for the drift check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusBackend {
    /// Shell out to `git status`.
    #[default]
    #[value(name = "git")]
    Git,
    /// Query the repository through libgit2 and render status lines.
    #[value(name = "libgit2")]
    Libgit2,
}

impl StatusBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusBackend::Git => "git",
            StatusBackend::Libgit2 => "libgit2",
        }
    }
}

impl fmt::Display for StatusBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invocation configuration. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Package manager executable, e.g. `C:\Program Files (x86)\Yarn\bin\yarn.cmd`
    pub yarn_path: PathBuf,
    pub assert_no_changes: bool,
    pub use_local_changes: bool,
    pub dry_run: bool,
    pub status_backend: StatusBackend,
}

impl BuildOptions {
    pub fn new(yarn_path: impl Into<PathBuf>) -> Self {
        BuildOptions {
            yarn_path: yarn_path.into(),
            assert_no_changes: false,
            use_local_changes: false,
            dry_run: false,
            status_backend: StatusBackend::default(),
        }
    }

    pub fn with_local_changes(mut self, enabled: bool) -> Self {
        self.use_local_changes = enabled;
        self
    }

    pub fn with_assert_no_changes(mut self, enabled: bool) -> Self {
        self.assert_no_changes = enabled;
        self
    }

    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }
}

/// Directory and file layout of the project. Defaults to the constants above;
/// a layout file may override any field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLayout {
    pub root_marker: String,
    pub widget_js_dir: PathBuf,
    pub vis_dir: PathBuf,
    pub vis_build_output: PathBuf,
    pub vendored_vis_path: PathBuf,
    pub cleanup_dirs: Vec<PathBuf>,
    pub generated_files: Vec<String>,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        ProjectLayout {
            root_marker: ROOT_MARKER.to_string(),
            widget_js_dir: PathBuf::from(WIDGET_JS_DIR),
            vis_dir: PathBuf::from(VIS_DIR),
            vis_build_output: PathBuf::from(VIS_BUILD_OUTPUT),
            vendored_vis_path: PathBuf::from(VENDORED_VIS_PATH),
            cleanup_dirs: CLEANUP_DIRS.iter().map(PathBuf::from).collect(),
            generated_files: WIDGET_GENERATED_FILES.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl ProjectLayout {
    /// Vendored visualization package inside the widget's dependency tree.
    pub fn vendored_vis_dir(&self) -> PathBuf {
        self.widget_js_dir.join(&self.vendored_vis_path)
    }

    /// Visualization build output directory.
    pub fn vis_output_dir(&self) -> PathBuf {
        self.vis_dir.join(&self.vis_build_output)
    }

    /// Cleanup directories resolved against the widget build directory.
    pub fn cleanup_paths(&self) -> Vec<PathBuf> {
        self.cleanup_dirs
            .iter()
            .map(|dir| self.widget_js_dir.join(dir))
            .collect()
    }
}
