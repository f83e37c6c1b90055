//! SourceUnit - the file-level record produced by the source parser.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A single parsed source file.
///
/// Created once per discovered file and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path relative to the build root
    path: PathBuf,

    /// Name of the package declared by the file
    package: String,

    /// Local imports (`./name`), stored without the `./` prefix
    imports: BTreeSet<String>,

    /// Whether the file defines the program entry point
    entry_point: bool,
}

impl SourceUnit {
    /// Create a new source unit.
    pub fn new(path: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        SourceUnit {
            path: path.into(),
            package: package.into(),
            imports: BTreeSet::new(),
            entry_point: false,
        }
    }

    /// Add local imports.
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports.extend(imports.into_iter().map(Into::into));
        self
    }

    /// Mark whether this file defines the entry point.
    pub fn with_entry_point(mut self, entry_point: bool) -> Self {
        self.entry_point = entry_point;
        self
    }

    /// Path relative to the build root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Owning package name.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Local dependency names.
    pub fn imports(&self) -> &BTreeSet<String> {
        &self.imports
    }

    /// Whether this file defines the entry point.
    pub fn is_entry_point(&self) -> bool {
        self.entry_point
    }

    /// Path as passed on toolchain command lines.
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// File name without its extension (`cmd/server.go` -> `server`).
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.display_path())
    }

    /// Check whether a user-supplied target name refers to this file.
    ///
    /// Accepts the root-relative path with or without the `.go` suffix.
    pub fn matches_target(&self, name: &str) -> bool {
        let name = name.strip_prefix("./").unwrap_or(name);
        let path = Path::new(name);
        if self.path == path {
            return true;
        }
        self.path.extension().is_some() && self.path.with_extension("") == path
    }
}

impl std::fmt::Display for SourceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
