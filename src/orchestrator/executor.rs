//! Step execution: package manager calls, directory swaps and the drift check.

use super::plan::BuildStep;
use crate::error::BuildError;
use crate::system::{self, CommandRunner, Invocation};
use crate::vcs::StatusProvider;
use std::path::{Path, PathBuf};

/// Everything a step needs from the outside world.
pub struct StepContext<'a> {
    pub root: &'a Path,
    pub yarn_path: &'a Path,
    pub runner: &'a dyn CommandRunner,
    pub status: &'a dyn StatusProvider,
}

impl StepContext<'_> {
    fn resolve(&self, relative: &Path) -> PathBuf {
        system::project_path(self.root, relative)
    }
}

/// Execute a single planned step.
pub async fn execute_step(step: &BuildStep, ctx: &StepContext<'_>) -> Result<(), BuildError> {
    match step {
        BuildStep::Yarn { dir, args, .. } => {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            let invocation = Invocation::new(ctx.yarn_path, &args, ctx.resolve(dir));
            log::debug!("[Build] {}", invocation.command_line());
            ctx.runner.run(&invocation).await
        }
        BuildStep::RemoveDirs { paths, .. } => {
            for path in paths {
                system::remove_dir(&ctx.resolve(path))?;
            }
            Ok(())
        }
        BuildStep::CopyDir { from, to, .. } => {
            system::copy_dir(&ctx.resolve(from), &ctx.resolve(to)).map(|_| ())
        }
        BuildStep::AssertNoChanges { files, .. } => check_generated_files(files, ctx.status).await,
    }
}

/// Fail on the first generated file that appears in the working-tree status.
///
/// `git diff` occasionally leaves out some of the JS files, so the check
/// searches `git status` text instead. Status is queried again for every
/// file.
pub async fn check_generated_files(
    files: &[String],
    status: &dyn StatusProvider,
) -> Result<(), BuildError> {
    for file_path in files {
        let status_text = status.status_text().await?;
        if status_text.contains(file_path.as_str()) {
            log::error!("[Drift] {} differs from the committed version", file_path);
            return Err(BuildError::UnexpectedlyModified(file_path.clone()));
        }
        log::debug!("[Drift] {} unchanged", file_path);
    }
    Ok(())
}
