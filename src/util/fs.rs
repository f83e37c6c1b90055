//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// True if the final path component starts with a dot.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a/b/c");

        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn test_relative_path() {
        let rel = relative_path(Path::new("/src/app"), Path::new("/src/app/util/u.go"));
        assert_eq!(rel, PathBuf::from("util/u.go"));
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(Path::new("src/.git")));
        assert!(is_hidden(Path::new(".hidden.go")));
        assert!(!is_hidden(Path::new("src/main.go")));
        assert!(!is_hidden(Path::new(".")));
    }
}
