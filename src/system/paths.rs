/// Project root precondition.
///
/// The build must be started from the project root, recognised by the root
/// marker directory (`error_analysis` by default). Every layout path is
/// resolved against the verified root, never against a guessed parent.

use crate::error::BuildError;
use std::path::{Path, PathBuf};

/// Check that the current working directory is the project root and return it.
pub fn ensure_cwd_is_project_root(marker: &str) -> Result<PathBuf, BuildError> {
    let cwd = std::env::current_dir().map_err(|e| BuildError::fs("read", ".", e))?;
    verify_project_root(&cwd, marker)?;
    Ok(cwd)
}

/// Check that `dir` contains the `marker` directory.
pub fn verify_project_root(dir: &Path, marker: &str) -> Result<(), BuildError> {
    if dir.join(marker).is_dir() {
        log::debug!("[Paths] Project root verified at {}", dir.display());
        Ok(())
    } else {
        Err(BuildError::NotProjectRoot {
            cwd: dir.to_path_buf(),
            marker: marker.to_string(),
        })
    }
}
