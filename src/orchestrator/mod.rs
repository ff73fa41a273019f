//! Build orchestration: widget install/build, optional local visualization
//! swap-in, cleanup and the drift check.

pub mod executor;
pub mod plan;
pub mod state;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use executor::{check_generated_files, execute_step, StepContext};
pub use plan::{plan, BuildStep};
pub use state::{BuildReport, StepRecord};

use crate::config::resolve_layout;
use crate::error::Result;
use crate::models::{BuildOptions, ProjectLayout};
use crate::system::{
    ensure_cwd_is_project_root, scoped, verify_project_root, CommandRunner, ProcessRunner,
    StepScope,
};
use crate::vcs::{status_provider_for, StatusProvider};

/// Resolve the layout and check that the current directory is its project root.
///
/// Reads the layout file when one is given and writes nothing, so a run from
/// the wrong directory fails before anything touches the disk.
pub fn locate_project(config: Option<&Path>) -> Result<(ProjectLayout, PathBuf)> {
    let layout = resolve_layout(config)?;
    let root = ensure_cwd_is_project_root(&layout.root_marker)?;
    Ok((layout, root))
}

/// Runs one widget build against a project root.
#[derive(Clone)]
pub struct WidgetBuilder {
    options: BuildOptions,
    layout: ProjectLayout,

    /// Directory every layout path is resolved against
    root: PathBuf,

    runner: Arc<dyn CommandRunner>,
    status: Arc<dyn StatusProvider>,
}

impl WidgetBuilder {
    /// Builder wired to real processes and the status backend named in `options`.
    pub fn new(options: BuildOptions, layout: ProjectLayout, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let status: Arc<dyn StatusProvider> =
            Arc::from(status_provider_for(options.status_backend, &root));
        WidgetBuilder {
            options,
            layout,
            root,
            runner: Arc::new(ProcessRunner),
            status,
        }
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_status_provider(mut self, status: Arc<dyn StatusProvider>) -> Self {
        self.status = status;
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Steps this builder would execute.
    pub fn plan(&self) -> Vec<BuildStep> {
        plan(&self.options, &self.layout)
    }

    /// Verify the project root, then execute the plan step by step.
    ///
    /// The first failing step aborts the run; nothing after it executes and
    /// nothing before it is rolled back.
    pub async fn run(&self) -> Result<BuildReport> {
        verify_project_root(&self.root, &self.layout.root_marker)?;

        if self.options.use_local_changes && self.options.assert_no_changes {
            log::warn!(
                "[Build] --assert-no-changes only applies to registry builds; skipped with --use-local-changes"
            );
        }

        let steps = self.plan();
        let mut report = BuildReport {
            dry_run: self.options.dry_run,
            ..BuildReport::default()
        };

        if self.options.dry_run {
            log::info!("[Build] Dry run: {} steps planned, none executed", steps.len());
            for (idx, step) in steps.iter().enumerate() {
                log::info!("[Build]   {}. {}: {}", idx + 1, step.description(), step);
                report.skipped.push(step.description());
            }
            return Ok(report);
        }

        let ctx = StepContext {
            root: &self.root,
            yarn_path: &self.options.yarn_path,
            runner: self.runner.as_ref(),
            status: self.status.as_ref(),
        };

        for step in &steps {
            let scope = StepScope::start(step.description());
            log::debug!("[Build] {}", step);
            match execute_step(step, &ctx).await {
                Ok(()) => {
                    let elapsed = scope.complete();
                    report.record(step.description(), elapsed);
                }
                Err(e) => {
                    scope.fail(&e);
                    return Err(e);
                }
            }
        }

        log::info!(
            "[Build] Widget build finished: {} steps in {:.2?}",
            report.completed.len(),
            report.total_elapsed()
        );
        Ok(report)
    }

    /// Drift check against the layout's generated files, outside of a full run.
    pub async fn check_generated_files(&self) -> Result<()> {
        scoped(
            "comparison between old and newly generated widget files",
            check_generated_files(&self.layout.generated_files, self.status.as_ref()),
        )
        .await
    }
}
