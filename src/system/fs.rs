//! Recursive directory removal and copy.

use crate::error::BuildError;
use std::fs;
use std::path::Path;

/// Remove a directory tree. A missing directory is an error.
pub fn remove_dir(path: &Path) -> Result<(), BuildError> {
    log::debug!("[FS] Removing {}", path.display());
    fs::remove_dir_all(path).map_err(|e| BuildError::fs("remove", path, e))
}

/// Copy the directory tree at `src` to `dst`, creating `dst` and any missing
/// parents. `dst` must not exist yet.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<u64, BuildError> {
    log::debug!("[FS] Copying {} -> {}", src.display(), dst.display());

    if !src.is_dir() {
        return Err(BuildError::fs(
            "copy",
            src,
            std::io::Error::new(std::io::ErrorKind::NotFound, "source is not a directory"),
        ));
    }
    if dst.exists() {
        return Err(BuildError::fs(
            "copy into",
            dst,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "destination already exists"),
        ));
    }

    let copied = copy_tree(src, dst)?;
    log::debug!("[FS] Copied {} files into {}", copied, dst.display());
    Ok(copied)
}

fn copy_tree(src: &Path, dst: &Path) -> Result<u64, BuildError> {
    fs::create_dir_all(dst).map_err(|e| BuildError::fs("create", dst, e))?;

    let mut copied = 0;
    let entries = fs::read_dir(src).map_err(|e| BuildError::fs("read", src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| BuildError::fs("read", src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        // Symlinks are followed, the copy holds real files.
        if from.is_dir() {
            copied += copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| BuildError::fs("copy", &from, e))?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_remove_dir() {
        let temp = tempdir().expect("Failed to create temp dir");
        let target = temp.path().join("dist").join("nested");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("bundle.js"), "x").unwrap();

        remove_dir(&temp.path().join("dist")).expect("remove failed");
        assert!(!temp.path().join("dist").exists());
    }

    #[test]
    fn test_remove_missing_dir_fails() {
        let temp = tempdir().expect("Failed to create temp dir");
        let err = remove_dir(&temp.path().join("lib")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to remove"));
    }

    #[test]
    fn test_copy_dir_creates_parents() {
        let temp = tempdir().expect("Failed to create temp dir");
        let src = temp.path().join("rel");
        fs::create_dir_all(src.join("lib")).unwrap();
        fs::write(src.join("index.js"), "index").unwrap();
        fs::write(src.join("lib").join("util.js"), "util").unwrap();

        let dst = temp.path().join("node_modules").join("pkg").join("rel");
        let copied = copy_dir(&src, &dst).expect("copy failed");

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dst.join("index.js")).unwrap(), "index");
        assert_eq!(fs::read_to_string(dst.join("lib").join("util.js")).unwrap(), "util");
    }

    #[test]
    fn test_copy_dir_refuses_existing_destination() {
        let temp = tempdir().expect("Failed to create temp dir");
        let src = temp.path().join("rel");
        let dst = temp.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();

        assert!(copy_dir(&src, &dst).is_err());
    }

    #[test]
    fn test_copy_dir_missing_source() {
        let temp = tempdir().expect("Failed to create temp dir");
        assert!(copy_dir(&temp.path().join("rel"), &temp.path().join("dst")).is_err());
    }
}
