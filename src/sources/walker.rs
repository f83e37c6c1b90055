//! Source tree walker.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

use crate::util::fs::is_hidden;

/// Extension of source files.
pub const SOURCE_EXTENSION: &str = "go";

/// Suffix of test files.
pub const TEST_SUFFIX: &str = "_test.go";

/// Finds source files below a root directory.
#[derive(Debug, Clone)]
pub struct SourceWalker {
    root: PathBuf,
    include_hidden: bool,
    include_tests: bool,
}

impl SourceWalker {
    /// Walk `root`, skipping hidden entries and test files.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SourceWalker {
            root: root.into(),
            include_hidden: false,
            include_tests: false,
        }
    }

    /// Descend into directories (and accept files) whose name starts with a dot.
    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.include_hidden = yes;
        self
    }

    /// Accept `_test.go` files.
    pub fn include_tests(mut self, yes: bool) -> Self {
        self.include_tests = yes;
        self
    }

    /// Root being walked.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collect every candidate source file, in file-name order per directory.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let include_hidden = self.include_hidden;
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| e.depth() == 0 || include_hidden || !is_hidden(e.path()));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.with_context(|| {
                format!("error while traversing {}", self.root.display())
            })?;
            if self.accepts(&entry) {
                files.push(entry.into_path());
            }
        }

        tracing::debug!("found {} source file(s) under {}", files.len(), self.root.display());
        Ok(files)
    }

    fn accepts(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_file() {
            return false;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        if name.ends_with(TEST_SUFFIX) && !self.include_tests {
            tracing::trace!("skipping test file {}", path.display());
            return false;
        }

        true
    }
}
