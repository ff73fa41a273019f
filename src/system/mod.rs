/// System module: subprocess execution, filesystem operations, project-root
/// precondition and scoped step logging.

pub mod fs;
pub mod paths;
pub mod scope;

use crate::error::BuildError;
use crate::log_collector::OUTPUT_TARGET;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

pub use fs::{copy_dir, remove_dir};
pub use paths::{ensure_cwd_is_project_root, verify_project_root};
pub use scope::{scoped, StepScope};

/// One external program call: what to run, with which arguments, where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, args: &[&str], cwd: impl Into<PathBuf>) -> Self {
        Invocation {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.into(),
        }
    }

    /// `program arg...` for log and error messages.
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Trait for running external programs to completion.
///
/// The production implementation spawns real processes; tests substitute a
/// recording runner.
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` and resolve once it exits. A non-zero exit is an error.
    fn run<'a>(&'a self, invocation: &'a Invocation) -> BoxFuture<'a, Result<(), BuildError>>;
}

/// Spawns processes with tokio and streams their output into the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run<'a>(&'a self, invocation: &'a Invocation) -> BoxFuture<'a, Result<(), BuildError>> {
        Box::pin(run_streaming(invocation))
    }
}

async fn run_streaming(invocation: &Invocation) -> Result<(), BuildError> {
    log::debug!(
        "[System] Spawning '{}' in {}",
        invocation.command_line(),
        invocation.cwd.display()
    );

    let mut command = Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .current_dir(&invocation.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| BuildError::Spawn {
        program: invocation.program.display().to_string(),
        cwd: invocation.cwd.clone(),
        source,
    })?;

    let mut stdout_lines = child.stdout.take().map(|s| BufReader::new(s).lines());
    let mut stderr_lines = child.stderr.take().map(|s| BufReader::new(s).lines());

    loop {
        if stdout_lines.is_none() && stderr_lines.is_none() {
            break;
        }

        tokio::select! {
            line = next_line(&mut stdout_lines), if stdout_lines.is_some() => {
                match line {
                    Some(line) => log::info!(target: OUTPUT_TARGET, "{}", line),
                    None => stdout_lines = None,
                }
            }
            line = next_line(&mut stderr_lines), if stderr_lines.is_some() => {
                match line {
                    Some(line) => log::info!(target: OUTPUT_TARGET, "[stderr] {}", line),
                    None => stderr_lines = None,
                }
            }
        }
    }

    let status = child.wait().await.map_err(|source| BuildError::Spawn {
        program: invocation.program.display().to_string(),
        cwd: invocation.cwd.clone(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(BuildError::CommandFailed {
            program: invocation.program.display().to_string(),
            args: invocation.args.clone(),
            cwd: invocation.cwd.clone(),
            code: status.code(),
        })
    }
}

/// Next line from an optional stream; `None` on EOF or read error.
async fn next_line<R>(lines: &mut Option<tokio::io::Lines<BufReader<R>>>) -> Option<String>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let lines = lines.as_mut()?;
    match lines.next_line().await {
        Ok(line) => line,
        Err(e) => {
            log::warn!("[System] Output read error: {}", e);
            None
        }
    }
}

/// Join a layout-relative path onto the project root.
pub fn project_path(root: &Path, relative: &Path) -> PathBuf {
    root.join(relative)
}
