//! Unified error type hierarchy for the widget builder
//!
//! Provides structured error handling with BuildError, ConfigError and VcsError.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Project layout file parsing and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid TOML in config: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Source-control status query errors.
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program} status' exited with {}", exit_label(*code))]
    StatusFailed { program: String, code: Option<i32> },

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Git2 error: {0}")]
    Git2(#[from] git2::Error),
}

/// Build orchestration errors. Every variant aborts the run.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("{cwd} is not the project root: expected a '{marker}' directory")]
    NotProjectRoot { cwd: PathBuf, marker: String },

    #[error("Failed to spawn '{program}' in {}: {source}", cwd.display())]
    Spawn {
        program: String,
        cwd: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{program} {}' in {} exited with {}", args.join(" "), cwd.display(), exit_label(*code))]
    CommandFailed {
        program: String,
        args: Vec<String>,
        cwd: PathBuf,
        code: Option<i32>,
    },

    #[error("Failed to {op} {}: {source}", path.display())]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("File {0} was unexpectedly modified.")]
    UnexpectedlyModified(String),

    #[error("Status query failed: {0}")]
    Status(#[from] VcsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BuildError {
    /// Wrap an io::Error raised while touching `path`.
    pub fn fs(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        BuildError::Filesystem {
            op,
            path: path.into(),
            source,
        }
    }
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

/// Result alias used across the orchestrator.
pub type Result<T> = std::result::Result<T, BuildError>;
