use crate::error::{InstallerError, Result};
use std::path::Path;

/// Create `path` and any missing parents. An existing directory is left alone.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => InstallerError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => InstallerError::from(e),
        })?;
    }
    Ok(())
}

pub fn is_empty_dir(path: &Path) -> Result<bool> {
    Ok(std::fs::read_dir(path)?.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_exists_is_recursive_and_idempotent() {
        let scratch = tempfile::tempdir().unwrap();
        let target = scratch.path().join("a").join("b").join("c");

        ensure_dir_exists(&target).unwrap();
        assert!(target.is_dir());
        ensure_dir_exists(&target).unwrap();
        assert!(is_empty_dir(&target).unwrap());
    }

    #[test]
    fn test_is_empty_dir() {
        let scratch = tempfile::tempdir().unwrap();
        assert!(is_empty_dir(scratch.path()).unwrap());
        std::fs::write(scratch.path().join("a.txt"), "a").unwrap();
        assert!(!is_empty_dir(scratch.path()).unwrap());
    }
}
