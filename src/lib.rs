//! Error Analysis widget builder
//!
//! Drives yarn to install and build the browser-embeddable dashboard widget,
//! optionally swapping in a locally built visualization bundle, and checks
//! that committed generated files did not drift.
//!
//! The crate is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Options, project layout and the fixed paths
//! - **config**: Layout file loading
//! - **cli**: Command line surface
//! - **system**: Subprocesses, filesystem, project-root check, step scopes
//! - **vcs**: Working-tree status backends
//! - **orchestrator**: Build plan and execution
//! - **log_collector**: stderr and on-disk logging

pub mod cli;
pub mod config;
pub mod error;
pub mod log_collector;
pub mod models;
pub mod orchestrator;
pub mod system;
pub mod vcs;

// Re-export the log crate for macro usage
pub use log;

pub use error::{BuildError, ConfigError, Result, VcsError};
pub use log_collector::{LogCollector, LogLine};
pub use models::{
    BuildOptions, ProjectLayout, StatusBackend, CLEANUP_DIRS, ROOT_MARKER, VENDORED_VIS_PATH,
    VIS_BUILD_OUTPUT, VIS_DIR, WIDGET_GENERATED_FILES, WIDGET_JS_DIR,
};
pub use orchestrator::{locate_project, plan, BuildReport, BuildStep, WidgetBuilder};
pub use system::{scoped, CommandRunner, Invocation, ProcessRunner, StepScope};
pub use vcs::StatusProvider;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert_eq!(VERSION, "0.1.0");
    }

    #[test]
    fn test_reexports() {
        let _: Result<()> = Ok(());
        assert_eq!(WIDGET_GENERATED_FILES.len(), 4);
        assert_eq!(CLEANUP_DIRS, ["dist", "lib", "node_modules"]);
    }
}
