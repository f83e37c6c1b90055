//! Build context - toolchain, output layout and include paths.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::toolchain::Toolchain;
use crate::util::fs::ensure_dir;

/// Where artifacts are written, derived from `-o`.
///
/// A value ending in `/`, or naming an existing directory, selects an
/// output directory. Anything else names the executable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputLayout {
    /// Directory prefix for every artifact (relative to the build root)
    pub dir: Option<PathBuf>,
    /// Explicit executable name
    pub executable: Option<String>,
}

impl OutputLayout {
    /// Interpret an `-o` value relative to `root`.
    ///
    /// When `create` is set, the output directory (or the parent directory
    /// of a named executable) is created.
    pub fn parse(root: &Path, value: Option<&str>, create: bool) -> Result<Self> {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return Ok(OutputLayout::default());
        };

        if value.ends_with('/') || root.join(value).is_dir() {
            let dir = PathBuf::from(value);
            if create {
                ensure_dir(&root.join(&dir))?;
            }
            return Ok(OutputLayout {
                dir: Some(dir),
                executable: None,
            });
        }

        if create {
            if let Some(parent) = Path::new(value).parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(&root.join(parent))?;
            }
        }

        Ok(OutputLayout {
            dir: None,
            executable: Some(value.to_string()),
        })
    }

    fn artifact(&self, file_name: String) -> PathBuf {
        match self.dir {
            Some(ref dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

/// Everything the toolchain invoker needs to build command lines.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Toolchain for the selected architecture
    pub toolchain: Toolchain,

    /// Output locations
    pub layout: OutputLayout,

    /// Additional include (compile) and library (link) search paths
    pub include_paths: Vec<PathBuf>,

    /// Build root; toolchain processes run here
    pub root: PathBuf,
}

impl BuildContext {
    /// Create a build context.
    pub fn new(toolchain: Toolchain, layout: OutputLayout, root: impl Into<PathBuf>) -> Self {
        BuildContext {
            toolchain,
            layout,
            include_paths: Vec::new(),
            root: root.into(),
        }
    }

    /// Set the include paths.
    pub fn with_include_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.include_paths = paths;
        self
    }

    /// Object file for an output name (`util` -> `util.6`).
    pub fn object_path(&self, output_name: &str) -> PathBuf {
        self.layout.artifact(format!(
            "{}{}",
            output_name,
            self.toolchain.object_suffix()
        ))
    }

    /// Linked executable for an output name.
    pub fn executable_path(&self, output_name: &str) -> PathBuf {
        self.layout.artifact(output_name.to_string())
    }

    /// Static library archive for a package.
    pub fn archive_path(&self, output_name: &str) -> PathBuf {
        self.layout.artifact(format!("{}.a", output_name))
    }
}
