//! Command line surface.
//!
//! ```text
//! build-widget --yarn-path <path> [--assert-no-changes] [--use-local-changes]
//! ```
//!
//! To validate local changes to the visualizations, add `--use-local-changes`
//! and reinstall the python package afterwards.

use crate::models::{BuildOptions, StatusBackend};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "build-widget")]
#[command(about = "Build widget for error analysis dashboard")]
pub struct Cli {
    /// The full path to the yarn executable
    /// (e.g. 'C:\Program Files (x86)\Yarn\bin\yarn.cmd').
    #[arg(long, value_name = "PATH")]
    pub yarn_path: PathBuf,

    /// Assert that the generated files did not change.
    #[arg(long)]
    pub assert_no_changes: bool,

    /// Use local changes instead of latest npm.
    #[arg(long)]
    pub use_local_changes: bool,

    /// Print the steps without running any of them.
    #[arg(long)]
    pub dry_run: bool,

    /// Layout overrides (.json or .toml).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How working-tree status is read for --assert-no-changes.
    #[arg(long, value_enum, default_value_t = StatusBackend::Git)]
    pub status_backend: StatusBackend,

    /// Also write the build log to a file in this directory.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// More output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            yarn_path: self.yarn_path.clone(),
            assert_no_changes: self.assert_no_changes,
            use_local_changes: self.use_local_changes,
            dry_run: self.dry_run,
            status_backend: self.status_backend,
        }
    }
}
