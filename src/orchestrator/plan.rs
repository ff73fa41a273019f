//! Build plan: the ordered list of steps one invocation performs.
//!
//! Planning is pure. Paths in the plan are relative to the project root;
//! the executor resolves them.

use crate::models::{BuildOptions, ProjectLayout};
use std::fmt;
use std::path::{Path, PathBuf};

/// One step of the widget build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStep {
    /// Run the package manager with `args` inside `dir`.
    Yarn {
        description: &'static str,
        dir: PathBuf,
        args: Vec<String>,
    },
    /// Remove each directory tree, in order.
    RemoveDirs {
        description: &'static str,
        paths: Vec<PathBuf>,
    },
    /// Copy the tree at `from` to `to`.
    CopyDir {
        description: &'static str,
        from: PathBuf,
        to: PathBuf,
    },
    /// Fail if any of `files` shows up in the working-tree status.
    AssertNoChanges {
        description: &'static str,
        files: Vec<String>,
    },
}

impl BuildStep {
    fn yarn(description: &'static str, dir: &Path, task: &str) -> Self {
        BuildStep::Yarn {
            description,
            dir: dir.to_path_buf(),
            args: vec![task.to_string()],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BuildStep::Yarn { description, .. }
            | BuildStep::RemoveDirs { description, .. }
            | BuildStep::CopyDir { description, .. }
            | BuildStep::AssertNoChanges { description, .. } => *description,
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStep::Yarn { dir, args, .. } => {
                write!(f, "yarn {} (in {})", args.join(" "), dir.display())
            }
            BuildStep::RemoveDirs { paths, .. } => {
                let paths: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                write!(f, "remove {}", paths.join(", "))
            }
            BuildStep::CopyDir { from, to, .. } => {
                write!(f, "copy {} -> {}", from.display(), to.display())
            }
            BuildStep::AssertNoChanges { files, .. } => {
                write!(f, "assert {} generated files unchanged", files.len())
            }
        }
    }
}

/// Plan the steps for `options` against `layout`.
pub fn plan(options: &BuildOptions, layout: &ProjectLayout) -> Vec<BuildStep> {
    let widget = &layout.widget_js_dir;
    let mut steps = vec![
        BuildStep::yarn("yarn install of dependencies", widget, "install"),
        BuildStep::yarn("yarn build", widget, "build:all"),
    ];

    if options.use_local_changes {
        // Build the visualizations from source and swap them in for the
        // registry copy inside the widget's dependencies.
        let vendored = layout.vendored_vis_dir();
        steps.push(BuildStep::yarn(
            "yarn install for visualizations",
            &layout.vis_dir,
            "install",
        ));
        steps.push(BuildStep::yarn(
            "yarn build for visualizations",
            &layout.vis_dir,
            "build",
        ));
        steps.push(BuildStep::RemoveDirs {
            description: "removing existing visualizations pulled from npm",
            paths: vec![vendored.clone()],
        });
        steps.push(BuildStep::CopyDir {
            description: "copying built visualizations into error analysis widget dependencies",
            from: layout.vis_output_dir(),
            to: vendored,
        });
        steps.push(BuildStep::yarn(
            "yarn build with copied local changes",
            widget,
            "build",
        ));
    } else {
        steps.push(BuildStep::RemoveDirs {
            description: "removal of extra directories",
            paths: layout.cleanup_paths(),
        });

        if options.assert_no_changes {
            steps.push(BuildStep::AssertNoChanges {
                description: "comparison between old and newly generated widget files",
                files: layout.generated_files.clone(),
            });
        }
    }

    steps
}
