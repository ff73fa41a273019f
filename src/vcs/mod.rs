//! Working-tree status text for the drift check.
//!
//! Two backends produce the same kind of text: the `git` executable's own
//! `git status` output, or a status listing rendered from libgit2. The drift
//! check only searches this text for file paths, so the exact formatting does
//! not matter as long as every changed or untracked path appears in it.

use crate::error::VcsError;
use crate::models::StatusBackend;
use futures::future::BoxFuture;
use git2::{Repository, Status, StatusOptions};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Trait for obtaining working-tree status text.
pub trait StatusProvider: Send + Sync {
    fn status_text(&self) -> BoxFuture<'_, Result<String, VcsError>>;
}

/// Build the provider for `backend`, rooted at `root`.
pub fn status_provider_for(backend: StatusBackend, root: &Path) -> Box<dyn StatusProvider> {
    match backend {
        StatusBackend::Git => Box::new(GitCliStatus::new(root)),
        StatusBackend::Libgit2 => Box::new(Libgit2Status::new(root)),
    }
}

/// Runs `git status` in the project root.
#[derive(Debug, Clone)]
pub struct GitCliStatus {
    program: PathBuf,
    root: PathBuf,
}

impl GitCliStatus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        GitCliStatus {
            program: PathBuf::from("git"),
            root: root.into(),
        }
    }

    /// Use a specific git executable instead of the one on PATH.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

impl StatusProvider for GitCliStatus {
    fn status_text(&self) -> BoxFuture<'_, Result<String, VcsError>> {
        Box::pin(async move {
            let program = self.program.display().to_string();
            let output = Command::new(&self.program)
                .arg("status")
                .current_dir(&self.root)
                .output()
                .await
                .map_err(|source| VcsError::Spawn {
                    program: program.clone(),
                    source,
                })?;

            if !output.status.success() {
                return Err(VcsError::StatusFailed {
                    program,
                    code: output.status.code(),
                });
            }

            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        })
    }
}

/// Renders status lines from libgit2, one per changed or untracked path.
#[derive(Debug, Clone)]
pub struct Libgit2Status {
    root: PathBuf,
}

impl Libgit2Status {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Libgit2Status { root: root.into() }
    }
}

impl StatusProvider for Libgit2Status {
    fn status_text(&self) -> BoxFuture<'_, Result<String, VcsError>> {
        let root = self.root.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || render_status(&root))
                .await
                .map_err(|e| VcsError::Repository(format!("status task failed: {}", e)))?
        })
    }
}

/// Render the working-tree status of the repository containing `root`.
///
/// Paths are relative to the repository workdir, so a path relative to a
/// nested project root still appears as a substring.
pub fn render_status(root: &Path) -> Result<String, VcsError> {
    let repo = Repository::discover(root).map_err(|e| {
        VcsError::Repository(format!(
            "Failed to open repository containing {}: {}",
            root.display(),
            e
        ))
    })?;

    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false)
        .renames_head_to_index(true);

    let statuses = repo.statuses(Some(&mut opts))?;

    let mut text = String::new();
    for entry in statuses.iter() {
        let Some(path) = entry.path() else {
            continue;
        };
        let status = entry.status();
        let label = status_label(status);

        if status.contains(Status::INDEX_RENAMED) {
            let from = entry
                .head_to_index()
                .and_then(|d| d.old_file().path().map(|p| p.display().to_string()));
            if let Some(from) = from {
                text.push_str(&format!("{:<12}{} -> {}\n", label, from, path));
                continue;
            }
        }
        text.push_str(&format!("{:<12}{}\n", label, path));
    }

    log::debug!(
        "[VCS] libgit2 status: {} entries under {}",
        statuses.len(),
        root.display()
    );
    Ok(text)
}

fn status_label(status: Status) -> &'static str {
    if status.contains(Status::CONFLICTED) {
        "both modified:"
    } else if status.intersects(Status::INDEX_NEW) {
        "new file:"
    } else if status.intersects(Status::INDEX_RENAMED | Status::WT_RENAMED) {
        "renamed:"
    } else if status.intersects(Status::INDEX_DELETED | Status::WT_DELETED) {
        "deleted:"
    } else if status.intersects(Status::INDEX_TYPECHANGE | Status::WT_TYPECHANGE) {
        "typechange:"
    } else if status.intersects(Status::INDEX_MODIFIED | Status::WT_MODIFIED) {
        "modified:"
    } else if status.contains(Status::WT_NEW) {
        "untracked:"
    } else {
        "changed:"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_precedence() {
        assert_eq!(status_label(Status::WT_MODIFIED), "modified:");
        assert_eq!(status_label(Status::WT_NEW), "untracked:");
        assert_eq!(status_label(Status::INDEX_NEW | Status::WT_MODIFIED), "new file:");
        assert_eq!(status_label(Status::WT_DELETED), "deleted:");
        assert_eq!(status_label(Status::CONFLICTED), "both modified:");
    }

    #[test]
    fn test_render_status_outside_repository() {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        // A fresh temp dir might still sit inside a repository on odd setups;
        // only assert on the error shape when discovery fails.
        if let Err(e) = render_status(temp.path()) {
            assert!(matches!(e, VcsError::Repository(_)));
        }
    }
}
