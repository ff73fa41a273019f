//! Shared fixtures: a throwaway project tree, a recording command runner and
//! a canned status provider.

#![allow(dead_code)]

use futures::future::BoxFuture;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use widget_build::{
    BuildError, CommandRunner, Invocation, ProjectLayout, StatusProvider, VcsError,
};

/// A project root laid out like the real repository, with the leftovers of
/// a registry build already in place.
pub struct ProjectFixture {
    pub dir: TempDir,
    pub layout: ProjectLayout,
}

impl ProjectFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let layout = ProjectLayout::default();
        let root = dir.path();

        fs::create_dir_all(root.join(&layout.root_marker)).expect("Failed to create marker");
        for cleanup in layout.cleanup_paths() {
            fs::create_dir_all(root.join(cleanup)).expect("Failed to create cleanup dir");
        }

        let vendored = root.join(layout.vendored_vis_dir());
        fs::create_dir_all(&vendored).expect("Failed to create vendored dir");
        fs::write(vendored.join("index.js"), "registry build").expect("Failed to write vendored file");

        let vis_out = root.join(layout.vis_output_dir());
        fs::create_dir_all(&vis_out).expect("Failed to create vis output");
        fs::write(vis_out.join("index.js"), "local build").expect("Failed to write vis output");

        ProjectFixture { dir, layout }
    }

    /// A directory without the root marker.
    pub fn without_marker() -> Self {
        let fixture = ProjectFixture::new();
        fs::remove_dir_all(fixture.root().join(&fixture.layout.root_marker))
            .expect("Failed to remove marker");
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root().join(relative)
    }
}

/// Records every invocation; optionally fails the n-th call (0-based).
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    fail_at: Option<usize>,
}

impl RecordingRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingRunner::default())
    }

    pub fn failing_at(index: usize) -> Arc<Self> {
        Arc::new(RecordingRunner {
            calls: Mutex::new(Vec::new()),
            fail_at: Some(index),
        })
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// (working directory relative to `root`, joined args) per call.
    pub fn calls_relative_to(&self, root: &Path) -> Vec<(PathBuf, String)> {
        self.calls()
            .into_iter()
            .map(|inv| {
                let rel = inv
                    .cwd
                    .strip_prefix(root)
                    .map(Path::to_path_buf)
                    .unwrap_or(inv.cwd.clone());
                (rel, inv.args.join(" "))
            })
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run<'a>(&'a self, invocation: &'a Invocation) -> BoxFuture<'a, Result<(), BuildError>> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(invocation.clone());
            calls.len() - 1
        };
        let fail = self.fail_at == Some(index);
        Box::pin(async move {
            if fail {
                Err(BuildError::CommandFailed {
                    program: invocation.program.display().to_string(),
                    args: invocation.args.clone(),
                    cwd: invocation.cwd.clone(),
                    code: Some(1),
                })
            } else {
                Ok(())
            }
        })
    }
}

/// Returns the same status text on every query and counts queries.
pub struct CannedStatus {
    text: String,
    queries: AtomicUsize,
}

impl CannedStatus {
    pub fn new(text: &str) -> Arc<Self> {
        Arc::new(CannedStatus {
            text: text.to_string(),
            queries: AtomicUsize::new(0),
        })
    }

    pub fn clean() -> Arc<Self> {
        CannedStatus::new("On branch main\nnothing to commit, working tree clean\n")
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl StatusProvider for CannedStatus {
    fn status_text(&self) -> BoxFuture<'_, Result<String, VcsError>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let text = self.text.clone();
        Box::pin(async move { Ok(text) })
    }
}
